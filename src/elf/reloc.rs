use crate::{
    Result,
    elf::{ElfRela, RELA_SIZE},
    error::malformed_section,
};
use alloc::format;
use byteorder::ByteOrder;
use core::marker::PhantomData;

/// A view of an `SHT_RELA` payload.
pub struct RelaTable<'data, E> {
    data: &'data [u8],
    entsize: usize,
    _marker: PhantomData<E>,
}

impl<'data, E: ByteOrder> RelaTable<'data, E> {
    pub(crate) fn new(data: &'data [u8], entsize: usize) -> Result<Self> {
        if entsize < RELA_SIZE {
            return Err(malformed_section(format!(
                "relocation entry size {entsize} is smaller than {RELA_SIZE}"
            )));
        }
        Ok(Self {
            data,
            entsize,
            _marker: PhantomData,
        })
    }

    /// Returns the number of entries, `sh_size / sh_entsize`.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.entsize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = ElfRela> + '_ {
        self.data
            .chunks_exact(self.entsize)
            .map(|raw| ElfRela::parse::<E>(raw))
    }
}
