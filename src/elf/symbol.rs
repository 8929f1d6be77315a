use crate::{
    Result,
    elf::{ElfSymbol, SYM_SIZE},
    error::malformed_section,
};
use alloc::format;
use byteorder::ByteOrder;
use core::marker::PhantomData;

/// A view of an `SHT_SYMTAB` payload.
///
/// Symbols are located with the entry size recorded in the owning section
/// header rather than the size of [`ElfSymbol`], so producers that pad their
/// entries still index correctly.
pub struct SymbolTable<'data, E> {
    data: &'data [u8],
    entsize: usize,
    _marker: PhantomData<E>,
}

impl<'data, E: ByteOrder> SymbolTable<'data, E> {
    pub(crate) fn new(data: &'data [u8], entsize: usize) -> Result<Self> {
        if entsize < SYM_SIZE {
            return Err(malformed_section(format!(
                "symbol table entry size {entsize} is smaller than {SYM_SIZE}"
            )));
        }
        Ok(Self {
            data,
            entsize,
            _marker: PhantomData,
        })
    }

    /// Returns the number of symbols in the table.
    #[inline]
    pub fn count(&self) -> usize {
        self.data.len() / self.entsize
    }

    #[inline]
    pub fn entsize(&self) -> usize {
        self.entsize
    }

    /// Reads the symbol at `idx`.
    pub fn symbol(&self, idx: usize) -> Result<ElfSymbol> {
        idx.checked_mul(self.entsize)
            .and_then(|start| self.data.get(start..start.checked_add(SYM_SIZE)?))
            .map(ElfSymbol::parse::<E>)
            .ok_or_else(|| {
                malformed_section(format!(
                    "symbol index {idx} is outside a table of {} entries",
                    self.count()
                ))
            })
    }
}
