use crate::{
    Result,
    elf::{ElfHeader, ElfShdr, SHDR_SIZE},
    error::malformed_section,
};
use alloc::{boxed::Box, format, vec::Vec};
use byteorder::ByteOrder;

/// The decoded section header table of an object.
///
/// Entries are read once, using the entry size the header declares, and kept
/// in file order so section indices stay meaningful.
#[derive(Debug, Clone)]
pub struct ElfShdrs {
    shdrs: Box<[ElfShdr]>,
}

impl ElfShdrs {
    pub(crate) fn parse<E: ByteOrder>(ehdr: &ElfHeader, data: &[u8]) -> Result<Self> {
        let shnum = ehdr.e_shnum();
        let shentsize = ehdr.e_shentsize();
        if shnum != 0 && shentsize < SHDR_SIZE {
            return Err(malformed_section(format!(
                "section header entry size {shentsize} is smaller than {SHDR_SIZE}"
            )));
        }
        let mut shdrs = Vec::with_capacity(shnum);
        for idx in 0..shnum {
            let start = ehdr.e_shoff() + idx * shentsize;
            let raw = data.get(start..start + SHDR_SIZE).ok_or_else(|| {
                malformed_section(format!("section header {idx} lies outside the object"))
            })?;
            shdrs.push(ElfShdr::parse::<E>(raw));
        }
        Ok(Self {
            shdrs: shdrs.into_boxed_slice(),
        })
    }

    #[inline]
    pub fn as_slice(&self) -> &[ElfShdr] {
        &self.shdrs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shdrs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shdrs.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&ElfShdr> {
        self.shdrs.get(idx)
    }

    /// Returns the first section of the given type together with its index.
    pub fn find(&self, sh_type: u32) -> Option<(usize, &ElfShdr)> {
        self.iter_type(sh_type).next()
    }

    /// Iterates, in table order, over the sections of the given type.
    pub fn iter_type(&self, sh_type: u32) -> impl Iterator<Item = (usize, &ElfShdr)> {
        self.shdrs
            .iter()
            .enumerate()
            .filter(move |(_, shdr)| shdr.sh_type() == sh_type)
    }
}
