//! Target architecture descriptors
//!
//! Everything that differs between CPU targets lives behind [`Arch`]: the byte
//! order of the object, the identifiers the header must carry, and the rules
//! for patching each relocation type. Parsing and the relocation loop are
//! written once against this trait.

use crate::{Result, relocation::RelocationContext};
use byteorder::ByteOrder;

mod powerpc;

pub use powerpc::{
    PowerPc, R_PPC_ADDR14, R_PPC_ADDR16, R_PPC_ADDR16_HA, R_PPC_ADDR16_HI, R_PPC_ADDR16_LO,
    R_PPC_ADDR24, R_PPC_ADDR32, R_PPC_NONE, R_PPC_REL14, R_PPC_REL24, R_PPC_REL32,
};

/// Compile-time description of a relocation target.
pub trait Arch {
    /// Byte order of every multi-byte field, in the object and in memory.
    type Endian: ByteOrder;

    /// Human readable architecture name used in error messages.
    const NAME: &'static str;

    /// Expected `e_machine`.
    const EM_ARCH: u16;

    /// Expected `EI_DATA` byte of `e_ident`.
    const E_DATA: u8;

    /// Converts a relocation type to its symbolic name.
    fn rel_type_to_str(r_type: u32) -> &'static str;

    /// Applies the built-in rule for the relocation in `ctx`.
    ///
    /// # Returns
    /// * `Ok(true)` - The type is known and the field was patched.
    /// * `Ok(false)` - The type is not known to this architecture; nothing was written.
    /// * `Err(e)` - The type is known but the patch could not be applied.
    fn relocate(ctx: &mut RelocationContext<'_, '_>) -> Result<bool>;
}
