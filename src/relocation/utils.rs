use crate::{
    Result,
    arch::Arch,
    object::ElfObject,
    relocation::RelocationHandler,
    segment::Module,
};
use core::ops::{Add, Sub};

/// A builder for configuring and executing the relocation process.
///
/// `Relocator` provides a fluent interface for installing relocation handlers
/// and choosing how unknown relocation types are treated before relocating a
/// module.
///
/// # Examples
/// ```no_run
/// use elf_dl::{ElfObject, Module, Segment};
///
/// let bytes: &[u8] = &[]; // ELF file bytes
/// let mut text = [0u8; 0x100];
/// let mut module = Module::new("demo");
/// module.push(Segment::new(1, 0x1000_0000, &mut text));
///
/// ElfObject::parse(bytes)
///     .unwrap()
///     .relocator()
///     .strict(true)
///     .relocate(&mut module)
///     .unwrap();
/// ```
pub struct Relocator<'obj, 'data, A: Arch, PreH, PostH> {
    object: &'obj ElfObject<'data, A>,
    pre_handler: PreH,
    post_handler: PostH,
    strict: bool,
}

impl<'obj, 'data, A: Arch> Relocator<'obj, 'data, A, (), ()> {
    /// Creates a new `Relocator` builder for the given object.
    pub fn new(object: &'obj ElfObject<'data, A>) -> Self {
        Self {
            object,
            pre_handler: (),
            post_handler: (),
            strict: false,
        }
    }
}

impl<'obj, 'data, A, PreH, PostH> Relocator<'obj, 'data, A, PreH, PostH>
where
    A: Arch,
    PreH: RelocationHandler,
    PostH: RelocationHandler,
{
    /// Sets the pre-processing relocation handler.
    ///
    /// This handler sees every entry before the built-in rule does. Returning
    /// `Some(Ok(()))` replaces the built-in rule for that entry.
    pub fn pre_handler<NewPreH>(self, handler: NewPreH) -> Relocator<'obj, 'data, A, NewPreH, PostH>
    where
        NewPreH: RelocationHandler,
    {
        Relocator {
            object: self.object,
            pre_handler: handler,
            post_handler: self.post_handler,
            strict: self.strict,
        }
    }

    /// Sets the post-processing relocation handler.
    ///
    /// This handler is consulted only for relocation types the architecture
    /// does not recognize.
    pub fn post_handler<NewPostH>(self, handler: NewPostH) -> Relocator<'obj, 'data, A, PreH, NewPostH>
    where
        NewPostH: RelocationHandler,
    {
        Relocator {
            object: self.object,
            pre_handler: self.pre_handler,
            post_handler: handler,
            strict: self.strict,
        }
    }

    /// Sets whether an unrecognized relocation type no handler claimed is an error.
    ///
    /// Off by default: such entries are skipped and, with the `log` feature,
    /// reported at `warn` level.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Executes the relocation process against the segments of `module`.
    ///
    /// Relocation stops at the first error. Entries applied before it stay
    /// applied, so the module must be discarded.
    pub fn relocate(mut self, module: &mut Module<'_>) -> Result<()> {
        self.object.relocate_impl(
            module,
            &mut self.pre_handler,
            &mut self.post_handler,
            self.strict,
        )
    }
}

/// A wrapper type for relocation values.
///
/// Arithmetic on the wrapped target address wraps modulo 2^32, matching the
/// address arithmetic of the 32-bit target regardless of the host word size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct RelocValue<T>(pub T);

impl<T> RelocValue<T> {
    #[inline]
    pub const fn new(val: T) -> Self {
        Self(val)
    }
}

impl Add<i32> for RelocValue<u32> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: i32) -> Self::Output {
        RelocValue(self.0.wrapping_add_signed(rhs))
    }
}

impl Sub<u32> for RelocValue<u32> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: u32) -> Self::Output {
        RelocValue(self.0.wrapping_sub(rhs))
    }
}

impl From<RelocValue<u32>> for u32 {
    #[inline]
    fn from(value: RelocValue<u32>) -> Self {
        value.0
    }
}
