//! ELF32 record definitions.
//!
//! The records are decoded field by field with an explicit byte order, so the
//! object bytes never have to be aligned or share the host's endianness. Each
//! type is an owned, immutable snapshot of one on-disk entry.

use byteorder::ByteOrder;
use elf::abi::{SHN_UNDEF, STB_LOCAL, STB_WEAK};

/// Only 32-bit objects are supported.
pub(crate) const E_CLASS: u8 = elf::abi::ELFCLASS32;
/// Size of the ELF32 file header.
pub const EHDR_SIZE: usize = core::mem::size_of::<elf::file::Elf32_Ehdr>();
/// Size of an ELF32 section header.
pub const SHDR_SIZE: usize = core::mem::size_of::<elf::section::Elf32_Shdr>();
/// Size of an ELF32 symbol table entry.
pub const SYM_SIZE: usize = 16;
/// Size of an ELF32 relocation entry with explicit addend.
pub const RELA_SIZE: usize = core::mem::size_of::<elf::relocation::Elf32_Rela>();

const REL_MASK: u32 = 0xFF;
const REL_BIT: u32 = 8;

/// ELF section header.
///
/// Section headers describe the sections of the object file. For relocation
/// sections `sh_info` holds the index of the section the entries patch, and
/// for tables `sh_entsize` holds the stride of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElfShdr {
    sh_name: u32,
    sh_type: u32,
    sh_flags: u32,
    sh_addr: u32,
    sh_offset: u32,
    sh_size: u32,
    sh_link: u32,
    sh_info: u32,
    sh_addralign: u32,
    sh_entsize: u32,
}

impl ElfShdr {
    /// Decodes a section header from the first [`SHDR_SIZE`] bytes of `raw`.
    pub(crate) fn parse<E: ByteOrder>(raw: &[u8]) -> Self {
        debug_assert!(raw.len() >= SHDR_SIZE);
        Self {
            sh_name: E::read_u32(&raw[0..4]),
            sh_type: E::read_u32(&raw[4..8]),
            sh_flags: E::read_u32(&raw[8..12]),
            sh_addr: E::read_u32(&raw[12..16]),
            sh_offset: E::read_u32(&raw[16..20]),
            sh_size: E::read_u32(&raw[20..24]),
            sh_link: E::read_u32(&raw[24..28]),
            sh_info: E::read_u32(&raw[28..32]),
            sh_addralign: E::read_u32(&raw[32..36]),
            sh_entsize: E::read_u32(&raw[36..40]),
        }
    }

    /// Returns the section name index into the section name string table.
    #[inline]
    pub fn sh_name(&self) -> u32 {
        self.sh_name
    }

    /// Returns the section type (`SHT_*`).
    #[inline]
    pub fn sh_type(&self) -> u32 {
        self.sh_type
    }

    /// Returns the section flags (`SHF_*`).
    #[inline]
    pub fn sh_flags(&self) -> u32 {
        self.sh_flags
    }

    #[inline]
    pub fn sh_addr(&self) -> u32 {
        self.sh_addr
    }

    /// Returns the file offset of the section payload.
    #[inline]
    pub fn sh_offset(&self) -> usize {
        self.sh_offset as usize
    }

    /// Returns the size of the section payload in bytes.
    #[inline]
    pub fn sh_size(&self) -> usize {
        self.sh_size as usize
    }

    #[inline]
    pub fn sh_link(&self) -> u32 {
        self.sh_link
    }

    /// Returns the extra information word. For `SHT_RELA` sections this is the
    /// index of the section the relocations apply to.
    #[inline]
    pub fn sh_info(&self) -> usize {
        self.sh_info as usize
    }

    #[inline]
    pub fn sh_addralign(&self) -> u32 {
        self.sh_addralign
    }

    /// Returns the size of one table entry, or zero if the section is not a table.
    #[inline]
    pub fn sh_entsize(&self) -> usize {
        self.sh_entsize as usize
    }
}

/// ELF symbol table entry.
///
/// By the time relocation runs the loader has already resolved every symbol,
/// so `st_value` holds the final address the relocations encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElfSymbol {
    st_name: u32,
    st_value: u32,
    st_size: u32,
    st_info: u8,
    st_other: u8,
    st_shndx: u16,
}

impl ElfSymbol {
    pub(crate) fn parse<E: ByteOrder>(raw: &[u8]) -> Self {
        debug_assert!(raw.len() >= SYM_SIZE);
        Self {
            st_name: E::read_u32(&raw[0..4]),
            st_value: E::read_u32(&raw[4..8]),
            st_size: E::read_u32(&raw[8..12]),
            st_info: raw[12],
            st_other: raw[13],
            st_shndx: E::read_u16(&raw[14..16]),
        }
    }

    /// Returns the symbol value.
    #[inline]
    pub fn st_value(&self) -> u32 {
        self.st_value
    }

    /// Returns the symbol name index.
    #[inline]
    pub fn st_name(&self) -> u32 {
        self.st_name
    }

    /// Returns the symbol size.
    #[inline]
    pub fn st_size(&self) -> u32 {
        self.st_size
    }

    /// Returns the symbol binding.
    #[inline]
    pub fn st_bind(&self) -> u8 {
        self.st_info >> 4
    }

    /// Returns the symbol type.
    #[inline]
    pub fn st_type(&self) -> u8 {
        self.st_info & 0xf
    }

    #[inline]
    pub fn st_other(&self) -> u8 {
        self.st_other
    }

    /// Returns the section index.
    #[inline]
    pub fn st_shndx(&self) -> usize {
        self.st_shndx as usize
    }

    /// Returns true if the symbol is undefined (not defined in this object file).
    #[inline]
    pub fn is_undef(&self) -> bool {
        self.st_shndx == SHN_UNDEF
    }

    #[inline]
    pub fn is_local(&self) -> bool {
        self.st_bind() == STB_LOCAL
    }

    #[inline]
    pub fn is_weak(&self) -> bool {
        self.st_bind() == STB_WEAK
    }
}

/// ELF RELA relocation entry.
///
/// The addend is carried in the entry itself; the bytes at the target are
/// never consulted to recover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElfRela {
    r_offset: u32,
    r_info: u32,
    r_addend: i32,
}

impl ElfRela {
    pub(crate) fn parse<E: ByteOrder>(raw: &[u8]) -> Self {
        debug_assert!(raw.len() >= RELA_SIZE);
        Self {
            r_offset: E::read_u32(&raw[0..4]),
            r_info: E::read_u32(&raw[4..8]),
            r_addend: E::read_i32(&raw[8..12]),
        }
    }

    /// Returns the relocation type.
    #[inline]
    pub fn r_type(&self) -> u32 {
        self.r_info & REL_MASK
    }

    /// Returns the symbol index.
    #[inline]
    pub fn r_symbol(&self) -> usize {
        (self.r_info >> REL_BIT) as usize
    }

    /// Returns the offset of the patched field within the target section.
    #[inline]
    pub fn r_offset(&self) -> u32 {
        self.r_offset
    }

    /// Returns the raw packed info word.
    #[inline]
    pub fn r_info(&self) -> u32 {
        self.r_info
    }

    /// Returns the relocation addend.
    #[inline]
    pub fn r_addend(&self) -> i32 {
        self.r_addend
    }
}
