use alloc::borrow::Cow;
use core::fmt::Display;

/// Error types used throughout the `elf_dl` library.
///
/// Every variant means the module is unusable. A loader is expected to fold
/// them all into a single "bad module" failure and discard the segment memory,
/// even when some relocations were already written before the error fired.
#[derive(Debug)]
pub enum Error {
    /// The buffer is not an ELF32 relocatable object for the target.
    ///
    /// This error typically indicates issues with the ELF header such as:
    /// * Invalid magic bytes
    /// * Wrong class, data encoding, object kind or machine
    /// * A section header table that does not fit in the buffer
    MalformedHeader {
        /// A descriptive message about the ELF header parsing error.
        msg: Cow<'static, str>,
    },

    /// A section header, section payload or table entry lies outside the
    /// object bytes, or a table declares an unusable entry size.
    MalformedSection {
        /// A descriptive message about the malformed section.
        msg: Cow<'static, str>,
    },

    /// The object carries no `SHT_SYMTAB` section.
    MissingSymbolTable {
        /// A descriptive message naming the module.
        msg: Cow<'static, str>,
    },

    /// A relocation targets bytes outside its segment.
    RelocationOutOfRange {
        /// A descriptive message about the offending relocation.
        msg: Cow<'static, str>,
    },

    /// A computed value does not fit the field the relocation encodes into.
    RelocationOverflow {
        /// A descriptive message about the offending relocation.
        msg: Cow<'static, str>,
    },

    /// A relocation type the target does not know, reported only when the
    /// relocator runs in strict mode.
    UnsupportedRelocation {
        /// A descriptive message about the offending relocation.
        msg: Cow<'static, str>,
    },

    /// An error occurred in a user-defined relocation handler.
    Custom {
        /// A descriptive message about the custom error.
        msg: Cow<'static, str>,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::MalformedHeader { msg } => write!(f, "ELF header parsing error: {msg}"),
            Error::MalformedSection { msg } => write!(f, "Section parsing error: {msg}"),
            Error::MissingSymbolTable { msg } => write!(f, "Missing symbol table: {msg}"),
            Error::RelocationOutOfRange { msg } => {
                write!(f, "Relocation out of range: {msg}")
            }
            Error::RelocationOverflow { msg } => write!(f, "Relocation overflow: {msg}"),
            Error::UnsupportedRelocation { msg } => {
                write!(f, "Unsupported relocation: {msg}")
            }
            Error::Custom { msg } => write!(f, "Custom error: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

#[cold]
#[inline(never)]
pub(crate) fn malformed_header(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::MalformedHeader { msg: msg.into() }
}

#[cold]
#[inline(never)]
pub(crate) fn malformed_section(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::MalformedSection { msg: msg.into() }
}

#[cold]
#[inline(never)]
pub(crate) fn missing_symtab(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::MissingSymbolTable { msg: msg.into() }
}

#[cold]
#[inline(never)]
pub(crate) fn out_of_range(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::RelocationOutOfRange { msg: msg.into() }
}

#[cold]
#[inline(never)]
pub(crate) fn overflow(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::RelocationOverflow { msg: msg.into() }
}

#[cold]
#[inline(never)]
pub(crate) fn unsupported(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::UnsupportedRelocation { msg: msg.into() }
}

/// Creates a custom error with the specified message.
///
/// Relocation handlers use this to report their own failures.
#[cold]
#[inline(never)]
pub fn custom_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::Custom { msg: msg.into() }
}
