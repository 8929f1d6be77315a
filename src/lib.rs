//! # elf_dl
//! The architecture half of loadable module support for 32-bit big-endian
//! PowerPC.
//! ## Usage
//! A generic loader reads an object into memory, calls [`is_valid_header`] to
//! decide whether to go on, allocates one [`Segment`] per loaded section,
//! resolves symbol values, and finally calls [`apply_relocations`] to patch
//! the segments in place.
//!
//! The richer API behind those two calls ([`ElfObject`] and its
//! [`Relocator`]) lets a caller install handlers for relocation types the
//! crate does not know, or make unknown types an error.
//! ## Example
//! ```no_run
//! use elf_dl::{Module, Segment, apply_relocations, is_valid_header};
//!
//! let bytes: &[u8] = &[]; // ELF file bytes
//! assert!(is_valid_header(bytes));
//! let mut text = [0u8; 0x40];
//! let mut module = Module::new("hello");
//! module.push(Segment::new(1, 0x0010_0000, &mut text));
//! apply_relocations(&mut module, bytes).unwrap();
//! ```
#![no_std]
extern crate alloc;

pub mod arch;
pub mod elf;
mod error;
pub mod object;
pub mod relocation;
pub mod segment;

pub use error::{Error, custom_error};
pub use object::ElfObject;
pub use relocation::{RelocationContext, RelocationHandler, Relocator};
pub use segment::{Module, Segment};

/// A type alias for `Result`s returned by `elf_dl` functions.
pub type Result<T> = core::result::Result<T, Error>;

/// Returns `true` if `buffer` holds a PowerPC ELF32 big-endian relocatable
/// object whose section header table lies inside the buffer.
///
/// Use [`ElfHeader::parse`](crate::elf::ElfHeader::parse) to learn why a buffer was rejected.
pub fn is_valid_header(buffer: &[u8]) -> bool {
    match crate::elf::ElfHeader::parse(buffer) {
        Ok(_) => true,
        Err(_err) => {
            #[cfg(feature = "log")]
            log::debug!("rejecting object: {}", _err);
            false
        }
    }
}

/// Applies every `SHT_RELA` section of the object in `buffer` to the segments
/// of `module`.
///
/// Sections whose target was not loaded are skipped. Unknown relocation types
/// are ignored; use [`ElfObject::relocator`] to change that.
///
/// # Errors
/// Relocation stops at the first error. Any relocations already written stay
/// in place, so the module must be discarded.
pub fn apply_relocations(module: &mut Module<'_>, buffer: &[u8]) -> Result<()> {
    ElfObject::parse(buffer)?.relocator().relocate(module)
}
