use crate::{
    Result,
    elf::{ElfRela, ElfSymbol},
    relocation::RelocValue,
    segment::Segment,
};

/// A trait for handling unknown or custom relocations.
///
/// Implement this to provide custom logic for relocation types the target
/// does not know, or to intercept and replace the built-in rule of a type it
/// does know.
///
/// # Examples
///
/// ```rust
/// use byteorder::BigEndian;
/// use elf_dl::relocation::{RelocationContext, RelocationHandler};
/// use elf_dl::Result;
///
/// struct Rel32;
///
/// impl RelocationHandler for Rel32 {
///     fn handle(&mut self, ctx: &mut RelocationContext<'_, '_>) -> Option<Result<()>> {
///         if ctx.r_type() != 26 {
///             return None;
///         }
///         let val = (ctx.value() - ctx.place()).0;
///         let offset = ctx.offset();
///         Some(ctx.segment_mut().write_u32::<BigEndian>(offset, val))
///     }
/// }
/// ```
pub trait RelocationHandler {
    /// Handles a relocation.
    ///
    /// # Arguments
    /// * `ctx` - Context containing the relocation entry, its symbol and the target segment.
    ///
    /// # Returns
    /// * `Some(Ok(()))` - Handled successfully.
    /// * `Some(Err(e))` - Handled but failed with error; relocation stops.
    /// * `None` - Not handled, fall through to default behavior.
    fn handle(&mut self, ctx: &mut RelocationContext<'_, '_>) -> Option<Result<()>>;
}

impl<F> RelocationHandler for F
where
    F: FnMut(&mut RelocationContext<'_, '_>) -> Option<Result<()>>,
{
    fn handle(&mut self, ctx: &mut RelocationContext<'_, '_>) -> Option<Result<()>> {
        self(ctx)
    }
}

impl RelocationHandler for () {
    fn handle(&mut self, _ctx: &mut RelocationContext<'_, '_>) -> Option<Result<()>> {
        None
    }
}

/// Context passed to `RelocationHandler::handle` containing relocation details.
///
/// Besides the entry and its resolved symbol, the context lends out the target
/// segment so a handler can patch it through the same bounds-checked writes
/// the built-in rules use.
pub struct RelocationContext<'a, 'mem> {
    module_name: &'a str,
    rela: &'a ElfRela,
    symbol: &'a ElfSymbol,
    segment: &'a mut Segment<'mem>,
}

impl<'a, 'mem> RelocationContext<'a, 'mem> {
    #[inline]
    pub(crate) fn new(
        module_name: &'a str,
        rela: &'a ElfRela,
        symbol: &'a ElfSymbol,
        segment: &'a mut Segment<'mem>,
    ) -> Self {
        Self {
            module_name,
            rela,
            symbol,
            segment,
        }
    }

    /// Access the relocation entry.
    #[inline]
    pub fn rela(&self) -> &ElfRela {
        self.rela
    }

    #[inline]
    pub fn r_type(&self) -> u32 {
        self.rela.r_type()
    }

    /// Access the symbol the entry refers to.
    #[inline]
    pub fn symbol(&self) -> &ElfSymbol {
        self.symbol
    }

    #[inline]
    pub fn module_name(&self) -> &str {
        self.module_name
    }

    /// Index of the section being patched.
    #[inline]
    pub fn section(&self) -> usize {
        self.segment.section()
    }

    /// Offset of the patched field within its segment.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.rela.r_offset()
    }

    /// The relocation value `S + A`, in wrapping 32-bit arithmetic.
    #[inline]
    pub fn value(&self) -> RelocValue<u32> {
        RelocValue::new(self.symbol.st_value()) + self.rela.r_addend()
    }

    /// The target address of the patched field, `P`.
    #[inline]
    pub fn place(&self) -> u32 {
        self.segment.addr().wrapping_add(self.rela.r_offset())
    }

    #[inline]
    pub fn segment(&self) -> &Segment<'mem> {
        self.segment
    }

    #[inline]
    pub fn segment_mut(&mut self) -> &mut Segment<'mem> {
        self.segment
    }
}
