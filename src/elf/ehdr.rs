//! ELF header parsing and validation
//!
//! The header is the gate every candidate buffer passes through before a
//! loader commits to it: it must describe an ELF32 relocatable object for the
//! target architecture, and its section header table must lie inside the
//! buffer so later table accesses never read past the end.

use crate::{
    Result,
    arch::{Arch, PowerPc},
    elf::{E_CLASS, EHDR_SIZE},
    error::malformed_header,
};
use alloc::format;
use byteorder::ByteOrder;
use elf::abi::{EI_CLASS, EI_DATA, EI_NIDENT, EI_VERSION, ELFMAGIC, ET_REL, EV_CURRENT};

/// A validated ELF32 file header.
///
/// This is an immutable snapshot decoded from the start of an object buffer.
/// Only headers that passed every validation check can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElfHeader {
    e_ident: [u8; EI_NIDENT],
    e_type: u16,
    e_machine: u16,
    e_version: u32,
    e_entry: u32,
    e_phoff: u32,
    e_shoff: u32,
    e_flags: u32,
    e_ehsize: u16,
    e_phentsize: u16,
    e_phnum: u16,
    e_shentsize: u16,
    e_shnum: u16,
    e_shstrndx: u16,
}

impl ElfHeader {
    /// Parses and validates a header for the PowerPC target.
    ///
    /// # Errors
    /// Returns [`Error::MalformedHeader`](crate::Error::MalformedHeader)
    /// naming the first check that failed.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_for::<PowerPc>(data)
    }

    /// Parses and validates a header for the target described by `A`.
    pub fn parse_for<A: Arch>(data: &[u8]) -> Result<Self> {
        if data.len() < EHDR_SIZE {
            return Err(malformed_header(format!(
                "buffer of {} bytes is smaller than the ELF header",
                data.len()
            )));
        }
        let ehdr = Self::decode::<A::Endian>(data);
        ehdr.validate::<A>(data.len())?;
        Ok(ehdr)
    }

    fn decode<E: ByteOrder>(raw: &[u8]) -> Self {
        let mut e_ident = [0u8; EI_NIDENT];
        e_ident.copy_from_slice(&raw[..EI_NIDENT]);
        Self {
            e_ident,
            e_type: E::read_u16(&raw[16..18]),
            e_machine: E::read_u16(&raw[18..20]),
            e_version: E::read_u32(&raw[20..24]),
            e_entry: E::read_u32(&raw[24..28]),
            e_phoff: E::read_u32(&raw[28..32]),
            e_shoff: E::read_u32(&raw[32..36]),
            e_flags: E::read_u32(&raw[36..40]),
            e_ehsize: E::read_u16(&raw[40..42]),
            e_phentsize: E::read_u16(&raw[42..44]),
            e_phnum: E::read_u16(&raw[44..46]),
            e_shentsize: E::read_u16(&raw[46..48]),
            e_shnum: E::read_u16(&raw[48..50]),
            e_shstrndx: E::read_u16(&raw[50..52]),
        }
    }

    fn validate<A: Arch>(&self, size: usize) -> Result<()> {
        if self.e_ident[0..4] != ELFMAGIC {
            return Err(malformed_header("invalid ELF magic"));
        }
        if self.e_ident[EI_CLASS] != E_CLASS {
            return Err(malformed_header("file class mismatch"));
        }
        if self.e_ident[EI_DATA] != A::E_DATA {
            return Err(malformed_header("data encoding mismatch"));
        }
        if self.e_ident[EI_VERSION] != EV_CURRENT {
            return Err(malformed_header("invalid ELF ident version"));
        }
        if self.e_type != ET_REL {
            return Err(malformed_header(format!(
                "object type {} is not a relocatable object",
                self.e_type
            )));
        }
        if self.e_machine != A::EM_ARCH {
            return Err(malformed_header(format!(
                "file arch mismatch: expected {} machine",
                A::NAME
            )));
        }
        if self.e_version != EV_CURRENT as u32 {
            return Err(malformed_header("invalid ELF version"));
        }
        let (_, shdr_end) = self.shdr_range();
        if shdr_end > size as u64 {
            return Err(malformed_header(format!(
                "section header table ends at {shdr_end:#x}, past the end of a {size:#x} byte buffer"
            )));
        }
        Ok(())
    }

    /// Returns the object file type (`ET_*`).
    #[inline]
    pub fn e_type(&self) -> u16 {
        self.e_type
    }

    /// Returns the machine identifier (`EM_*`).
    #[inline]
    pub fn e_machine(&self) -> u16 {
        self.e_machine
    }

    #[inline]
    pub fn e_flags(&self) -> u32 {
        self.e_flags
    }

    #[inline]
    pub fn e_entry(&self) -> u32 {
        self.e_entry
    }

    #[inline]
    pub fn e_phoff(&self) -> u32 {
        self.e_phoff
    }

    #[inline]
    pub fn e_ehsize(&self) -> u16 {
        self.e_ehsize
    }

    #[inline]
    pub fn e_phentsize(&self) -> u16 {
        self.e_phentsize
    }

    #[inline]
    pub fn e_phnum(&self) -> u16 {
        self.e_phnum
    }

    /// Gets the file offset of the section header table
    #[inline]
    pub fn e_shoff(&self) -> usize {
        self.e_shoff as usize
    }

    /// Gets the size of each section header entry
    #[inline]
    pub fn e_shentsize(&self) -> usize {
        self.e_shentsize as usize
    }

    /// Gets the number of section headers
    #[inline]
    pub fn e_shnum(&self) -> usize {
        self.e_shnum as usize
    }

    /// Gets the index of the section name string table
    #[inline]
    pub fn e_shstrndx(&self) -> usize {
        self.e_shstrndx as usize
    }

    /// Calculates the byte range `[start, end)` of the section header table.
    ///
    /// The range is computed in 64 bits so a hostile header cannot wrap it
    /// back inside the buffer.
    #[inline]
    pub fn shdr_range(&self) -> (u64, u64) {
        let shdrs_size = self.e_shentsize as u64 * self.e_shnum as u64;
        let shdr_start = self.e_shoff as u64;
        let shdr_end = shdr_start + shdrs_size;
        (shdr_start, shdr_end)
    }
}
