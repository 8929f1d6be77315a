//! The relocatable object being loaded
use crate::{
    Result,
    arch::{Arch, PowerPc},
    elf::{ElfHeader, ElfShdr, ElfShdrs, RelaTable, SHT_SYMTAB, SymbolTable},
    error::{malformed_section, missing_symtab},
    relocation::Relocator,
};
use alloc::format;
use core::marker::PhantomData;

/// A read-only view of a relocatable object held in memory.
///
/// The view pairs a validated header with the decoded section header table
/// and the object bytes. It never writes to those bytes; relocation results
/// land in the segments of a [`Module`](crate::Module).
#[derive(Debug)]
pub struct ElfObject<'data, A: Arch = PowerPc> {
    ehdr: ElfHeader,
    data: &'data [u8],
    shdrs: ElfShdrs,
    _marker: PhantomData<A>,
}

impl<'data> ElfObject<'data> {
    /// Parses a PowerPC relocatable object.
    ///
    /// # Errors
    /// * [`Error::MalformedHeader`](crate::Error::MalformedHeader) if the header is rejected.
    /// * [`Error::MalformedSection`](crate::Error::MalformedSection) if the
    ///   section header table cannot be decoded.
    pub fn parse(data: &'data [u8]) -> Result<Self> {
        Self::parse_for(data)
    }
}

impl<'data, A: Arch> ElfObject<'data, A> {
    /// Parses a relocatable object for the target described by `A`.
    pub fn parse_for(data: &'data [u8]) -> Result<Self> {
        let ehdr = ElfHeader::parse_for::<A>(data)?;
        let shdrs = ElfShdrs::parse::<A::Endian>(&ehdr, data)?;
        Ok(Self {
            ehdr,
            data,
            shdrs,
            _marker: PhantomData,
        })
    }

    #[inline]
    pub fn header(&self) -> &ElfHeader {
        &self.ehdr
    }

    #[inline]
    pub fn data(&self) -> &'data [u8] {
        self.data
    }

    #[inline]
    pub fn shdrs(&self) -> &ElfShdrs {
        &self.shdrs
    }

    /// Returns the payload of a section.
    ///
    /// Fails with [`Error::MalformedSection`](crate::Error::MalformedSection)
    /// if the payload does not lie inside the object bytes.
    pub fn section_data(&self, shdr: &ElfShdr) -> Result<&'data [u8]> {
        let start = shdr.sh_offset();
        start
            .checked_add(shdr.sh_size())
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| {
                malformed_section(format!(
                    "section payload [{:#x}, +{:#x}) lies outside a {:#x} byte object",
                    start,
                    shdr.sh_size(),
                    self.data.len()
                ))
            })
    }

    /// Returns the first symbol table of the object.
    pub fn symtab(&self) -> Result<SymbolTable<'data, A::Endian>> {
        let (_, shdr) = self
            .shdrs
            .find(SHT_SYMTAB)
            .ok_or_else(|| missing_symtab("object has no SHT_SYMTAB section"))?;
        SymbolTable::new(self.section_data(shdr)?, shdr.sh_entsize())
    }

    /// Returns the entries of an `SHT_RELA` section.
    pub fn rela_table(&self, shdr: &ElfShdr) -> Result<RelaTable<'data, A::Endian>> {
        RelaTable::new(self.section_data(shdr)?, shdr.sh_entsize())
    }

    /// Creates a builder for relocating a module loaded from this object.
    pub fn relocator(&self) -> Relocator<'_, 'data, A, (), ()> {
        Relocator::new(self)
    }
}
