//! Relocation of loaded modules
//!
//! The entry point is [`Relocator`], obtained from
//! [`ElfObject::relocator`](crate::object::ElfObject::relocator). It walks every
//! `SHT_RELA` section of the object and patches the segment the section
//! targets, consulting optional [`RelocationHandler`]s along the way.

mod engine;
mod traits;
mod utils;

use crate::arch::Arch;
use alloc::{format, string::String};
use core::fmt::Display;

pub use traits::{RelocationContext, RelocationHandler};
pub use utils::{RelocValue, Relocator};

/// Builds the message of a relocation failure.
///
/// The message names the module, the relocation type, the patched offset and
/// the symbol the entry refers to.
pub(crate) fn reloc_msg<A: Arch>(ctx: &RelocationContext<'_, '_>, err: impl Display) -> String {
    let r_type_str = A::rel_type_to_str(ctx.r_type());
    let r_sym = ctx.rela().r_symbol();
    if r_sym == 0 {
        format!(
            "module: {}, relocation type: {}, offset: {:#x} in section {}, no symbol, error: {}",
            ctx.module_name(),
            r_type_str,
            ctx.offset(),
            ctx.section(),
            err
        )
    } else {
        format!(
            "module: {}, relocation type: {}, offset: {:#x} in section {}, symbol index: {}, error: {}",
            ctx.module_name(),
            r_type_str,
            ctx.offset(),
            ctx.section(),
            r_sym,
            err
        )
    }
}
