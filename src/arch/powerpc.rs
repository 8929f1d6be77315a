use super::Arch;
use crate::{
    Result,
    error::overflow,
    relocation::{RelocationContext, reloc_msg},
};
use alloc::format;
use byteorder::BigEndian;
use elf::abi::{ELFDATA2MSB, EM_PPC};

pub const R_PPC_NONE: u32 = 0;
pub const R_PPC_ADDR32: u32 = 1;
pub const R_PPC_ADDR24: u32 = 2;
pub const R_PPC_ADDR16: u32 = 3;
pub const R_PPC_ADDR16_LO: u32 = 4;
pub const R_PPC_ADDR16_HI: u32 = 5;
pub const R_PPC_ADDR16_HA: u32 = 6;
pub const R_PPC_ADDR14: u32 = 7;
pub const R_PPC_REL24: u32 = 10;
pub const R_PPC_REL14: u32 = 11;
pub const R_PPC_REL32: u32 = 26;

/// Opcode and AA/LK bits of an `I`-form branch.
const REL24_KEEP: u32 = 0xfc00_0003;
/// Word-aligned 26-bit displacement field of an `I`-form branch.
const REL24_FIELD: u32 = 0x03ff_fffc;

/// 32-bit big-endian PowerPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerPc;

impl Arch for PowerPc {
    type Endian = BigEndian;

    const NAME: &'static str = "PowerPC";
    const EM_ARCH: u16 = EM_PPC;
    const E_DATA: u8 = ELFDATA2MSB;

    fn rel_type_to_str(r_type: u32) -> &'static str {
        match r_type {
            R_PPC_NONE => "R_PPC_NONE",
            R_PPC_ADDR32 => "R_PPC_ADDR32",
            R_PPC_ADDR24 => "R_PPC_ADDR24",
            R_PPC_ADDR16 => "R_PPC_ADDR16",
            R_PPC_ADDR16_LO => "R_PPC_ADDR16_LO",
            R_PPC_ADDR16_HI => "R_PPC_ADDR16_HI",
            R_PPC_ADDR16_HA => "R_PPC_ADDR16_HA",
            R_PPC_ADDR14 => "R_PPC_ADDR14",
            R_PPC_REL24 => "R_PPC_REL24",
            R_PPC_REL14 => "R_PPC_REL14",
            R_PPC_REL32 => "R_PPC_REL32",
            _ => "UNKNOWN",
        }
    }

    fn relocate(ctx: &mut RelocationContext<'_, '_>) -> Result<bool> {
        let offset = ctx.offset();
        let value = ctx.value();
        match ctx.r_type() {
            R_PPC_NONE => {}
            R_PPC_ADDR32 => {
                ctx.segment_mut()
                    .write_u32::<BigEndian>(offset, value.0)?;
            }
            R_PPC_ADDR16_LO => {
                ctx.segment_mut()
                    .write_u16::<BigEndian>(offset, value.0 as u16)?;
            }
            R_PPC_ADDR16_HA => {
                // high half, adjusted for the sign of the low half
                let ha = (value + 0x8000).0 >> 16;
                ctx.segment_mut()
                    .write_u16::<BigEndian>(offset, ha as u16)?;
            }
            R_PPC_REL24 => {
                let delta = (value - ctx.place()).0 as i32;
                if (delta << 6) >> 6 != delta {
                    return Err(overflow(reloc_msg::<Self>(
                        ctx,
                        format!("branch displacement {delta:#x} does not fit in 26 bits"),
                    )));
                }
                let segment = ctx.segment_mut();
                let insn = segment.read_u32::<BigEndian>(offset)?;
                segment.write_u32::<BigEndian>(
                    offset,
                    (insn & REL24_KEEP) | (delta as u32 & REL24_FIELD),
                )?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}
