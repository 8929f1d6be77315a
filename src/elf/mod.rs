//! ELF (Executable and Linkable Format) data structures and utilities.

mod defs;
mod ehdr;
mod reloc;
mod shdrs;
mod symbol;

pub(crate) use defs::E_CLASS;

pub use defs::{ElfRela, ElfShdr, ElfSymbol, EHDR_SIZE, RELA_SIZE, SHDR_SIZE, SYM_SIZE};
pub use ehdr::ElfHeader;
pub use reloc::RelaTable;
pub use shdrs::ElfShdrs;
pub use symbol::SymbolTable;

/// ELF ABI constants and definitions from the elf crate.
pub use elf::abi::*;
