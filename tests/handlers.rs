mod common;

use byteorder::BigEndian;
use common::{Rela, Sym, TEXT_ADDR, TEXT_IDX, read_u32, text_object};
use elf_dl::{
    ElfObject, Error, Module, RelocationContext, RelocationHandler, Result, Segment,
    arch::{R_PPC_ADDR32, R_PPC_REL32},
    custom_error,
};
use rstest::rstest;

/// Unknown to the built-in rules.
const R_PPC_UNKNOWN: u32 = 200;

fn mixed_object() -> Vec<u8> {
    text_object(
        0x10,
        &[Sym::abs(0x0020_0000)],
        &[
            Rela::new(0, 1, R_PPC_ADDR32, 0),
            Rela::new(4, 1, R_PPC_REL32, 8),
            Rela::new(8, 1, R_PPC_UNKNOWN, 0),
            Rela::new(12, 1, R_PPC_ADDR32, 4),
        ],
    )
}

struct Rel32;

impl RelocationHandler for Rel32 {
    fn handle(&mut self, ctx: &mut RelocationContext<'_, '_>) -> Option<Result<()>> {
        if ctx.r_type() != R_PPC_REL32 {
            return None;
        }
        let val = (ctx.value() - ctx.place()).0;
        let offset = ctx.offset();
        Some(ctx.segment_mut().write_u32::<BigEndian>(offset, val))
    }
}

fn text_module(mem: &mut [u8]) -> Module<'_> {
    let mut module = Module::new("handlers");
    module.push(Segment::new(TEXT_IDX, TEXT_ADDR, mem));
    module
}

#[rstest]
fn unknown_types_are_ignored_by_default() {
    let bytes = mixed_object();
    let mut mem = [0u8; 0x10];
    let mut module = text_module(&mut mem);
    ElfObject::parse(&bytes)
        .unwrap()
        .relocator()
        .relocate(&mut module)
        .unwrap();
    drop(module);
    assert_eq!(read_u32(&mem, 0), 0x0020_0000);
    assert_eq!(read_u32(&mem, 4), 0);
    assert_eq!(read_u32(&mem, 8), 0);
    assert_eq!(read_u32(&mem, 12), 0x0020_0004);
}

#[rstest]
fn strict_mode_rejects_unknown_types() {
    let bytes = mixed_object();
    let mut mem = [0u8; 0x10];
    let mut module = text_module(&mut mem);
    let err = ElfObject::parse(&bytes)
        .unwrap()
        .relocator()
        .strict(true)
        .relocate(&mut module)
        .unwrap_err();
    drop(module);
    assert!(matches!(err, Error::UnsupportedRelocation { .. }));
    assert!(err.to_string().contains("R_PPC_REL32"));
    assert_eq!(read_u32(&mem, 0), 0x0020_0000);
    assert_eq!(read_u32(&mem, 12), 0);
}

#[rstest]
fn post_handler_claims_unknown_types() {
    let bytes = mixed_object();
    let mut mem = [0u8; 0x10];
    let mut module = text_module(&mut mem);
    let object = ElfObject::parse(&bytes).unwrap();
    let mut seen = Vec::new();
    object
        .relocator()
        .post_handler(|ctx: &mut RelocationContext<'_, '_>| {
            seen.push(ctx.r_type());
            Rel32.handle(ctx)
        })
        .relocate(&mut module)
        .unwrap();
    drop(module);
    // ADDR32 never reaches the post handler
    assert_eq!(seen, [R_PPC_REL32, R_PPC_UNKNOWN]);
    // S + A - P = 0x200000 + 8 - 0x100004
    assert_eq!(read_u32(&mem, 4), 0x0010_0004);
    assert_eq!(read_u32(&mem, 8), 0);
}

#[rstest]
fn strict_mode_accepts_claimed_types() {
    let bytes = text_object(
        0x10,
        &[Sym::abs(TEXT_ADDR + 0x20)],
        &[Rela::new(0, 1, R_PPC_REL32, 0)],
    );
    let mut mem = [0u8; 0x10];
    let mut module = text_module(&mut mem);
    ElfObject::parse(&bytes)
        .unwrap()
        .relocator()
        .post_handler(Rel32)
        .strict(true)
        .relocate(&mut module)
        .unwrap();
    drop(module);
    assert_eq!(read_u32(&mem, 0), 0x20);
}

#[rstest]
fn pre_handler_overrides_builtin_rule() {
    let bytes = mixed_object();
    let mut mem = [0u8; 0x10];
    let mut module = text_module(&mut mem);
    ElfObject::parse(&bytes)
        .unwrap()
        .relocator()
        .pre_handler(|ctx: &mut RelocationContext<'_, '_>| {
            if ctx.r_type() != R_PPC_ADDR32 {
                return None;
            }
            let offset = ctx.offset();
            Some(ctx.segment_mut().write_u32::<BigEndian>(offset, 0xfeed_face))
        })
        .relocate(&mut module)
        .unwrap();
    drop(module);
    assert_eq!(read_u32(&mem, 0), 0xfeed_face);
    assert_eq!(read_u32(&mem, 12), 0xfeed_face);
}

#[rstest]
fn handler_errors_stop_relocation() {
    let bytes = mixed_object();
    let mut mem = [0u8; 0x10];
    let mut module = text_module(&mut mem);
    let err = ElfObject::parse(&bytes)
        .unwrap()
        .relocator()
        .post_handler(|ctx: &mut RelocationContext<'_, '_>| -> Option<Result<()>> {
            Some(Err(custom_error(format!(
                "cannot apply type {} in {}",
                ctx.r_type(),
                ctx.module_name()
            ))))
        })
        .relocate(&mut module)
        .unwrap_err();
    drop(module);
    assert!(matches!(err, Error::Custom { .. }));
    assert!(err.to_string().contains("handlers"));
    assert_eq!(read_u32(&mem, 12), 0);
}

#[test]
fn context_exposes_entry_and_symbol() {
    let bytes = text_object(
        0x10,
        &[Sym::abs(0x4000)],
        &[Rela::new(8, 1, R_PPC_UNKNOWN, -4)],
    );
    let mut mem = [0u8; 0x10];
    let mut module = text_module(&mut mem);
    let mut checked = false;
    ElfObject::parse(&bytes)
        .unwrap()
        .relocator()
        .post_handler(|ctx: &mut RelocationContext<'_, '_>| {
            assert_eq!(ctx.section(), TEXT_IDX);
            assert_eq!(ctx.offset(), 8);
            assert_eq!(ctx.rela().r_symbol(), 1);
            assert_eq!(ctx.rela().r_addend(), -4);
            assert_eq!(ctx.symbol().st_value(), 0x4000);
            assert_eq!(ctx.value().0, 0x3ffc);
            assert_eq!(ctx.place(), TEXT_ADDR + 8);
            assert_eq!(ctx.segment().size(), 0x10);
            checked = true;
            Some(Ok(()))
        })
        .relocate(&mut module)
        .unwrap();
    assert!(checked);
}
