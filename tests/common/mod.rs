#![allow(dead_code)]

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use elf_dl::{
    Module, Segment, apply_relocations,
    elf::{
        EHDR_SIZE, ELFCLASS32, ELFDATA2MSB, ELFMAGIC, EM_PPC, ET_REL, EV_CURRENT, RELA_SIZE,
        SHDR_SIZE, SHN_ABS, SHT_NULL, SHT_PROGBITS, SHT_RELA, SHT_SYMTAB, STB_GLOBAL, STT_NOTYPE,
        SYM_SIZE,
    },
};

/// Section index of `.text` in objects from [`text_object`].
pub const TEXT_IDX: usize = 1;
/// Load address given to `.text` by [`relocate_text`].
pub const TEXT_ADDR: u32 = 0x0010_0000;

// Offsets of section header fields.
pub const SH_OFFSET: usize = 16;
pub const SH_SIZE: usize = 20;
pub const SH_INFO: usize = 28;
pub const SH_ENTSIZE: usize = 36;

// SHF_ALLOC | SHF_EXECINSTR
const TEXT_FLAGS: u32 = 0x6;

#[derive(Clone, Copy, Debug)]
pub struct Sym {
    pub value: u32,
    pub shndx: u16,
    pub info: u8,
}

impl Sym {
    /// A global absolute symbol, as left behind by symbol resolution.
    pub fn abs(value: u32) -> Self {
        Self {
            value,
            shndx: SHN_ABS,
            info: (STB_GLOBAL << 4) | STT_NOTYPE,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Rela {
    pub offset: u32,
    pub sym: u32,
    pub r_type: u32,
    pub addend: i32,
}

impl Rela {
    pub fn new(offset: u32, sym: u32, r_type: u32, addend: i32) -> Self {
        Self {
            offset,
            sym,
            r_type,
            addend,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SectionDesc {
    pub sh_type: u32,
    pub flags: u32,
    pub data: Vec<u8>,
    pub link: u32,
    pub info: u32,
    pub entsize: u32,
}

impl SectionDesc {
    fn null() -> Self {
        Self {
            sh_type: SHT_NULL,
            flags: 0,
            data: Vec::new(),
            link: 0,
            info: 0,
            entsize: 0,
        }
    }
}

/// Assembles big-endian ELF32 PowerPC relocatable objects.
///
/// Section 0 is always the null section. Payloads follow the header in
/// section order and the section header table ends the file.
pub struct ObjectBuilder {
    pub sections: Vec<SectionDesc>,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self {
            sections: vec![SectionDesc::null()],
        }
    }

    pub fn add(&mut self, desc: SectionDesc) -> usize {
        self.sections.push(desc);
        self.sections.len() - 1
    }

    pub fn progbits(&mut self, size: usize) -> usize {
        self.add(SectionDesc {
            sh_type: SHT_PROGBITS,
            flags: TEXT_FLAGS,
            data: vec![0; size],
            link: 0,
            info: 0,
            entsize: 0,
        })
    }

    /// Adds a symbol table. `syms[i]` gets symbol index `i + 1`.
    pub fn symtab(&mut self, syms: &[Sym]) -> usize {
        self.symtab_with_entsize(syms, SYM_SIZE as u32)
    }

    /// Adds a symbol table whose entries are padded to `entsize` bytes.
    pub fn symtab_with_entsize(&mut self, syms: &[Sym], entsize: u32) -> usize {
        let mut data = Vec::new();
        let null = Sym {
            value: 0,
            shndx: 0,
            info: 0,
        };
        for sym in core::iter::once(&null).chain(syms) {
            let start = data.len();
            data.write_u32::<BigEndian>(0).unwrap();
            data.write_u32::<BigEndian>(sym.value).unwrap();
            data.write_u32::<BigEndian>(0).unwrap();
            data.write_u8(sym.info).unwrap();
            data.write_u8(0).unwrap();
            data.write_u16::<BigEndian>(sym.shndx).unwrap();
            data.resize(start + (entsize as usize).max(SYM_SIZE), 0);
        }
        self.add(SectionDesc {
            sh_type: SHT_SYMTAB,
            flags: 0,
            data,
            link: 0,
            info: 1,
            entsize,
        })
    }

    /// Adds an `SHT_RELA` section patching section `target`.
    pub fn rela(&mut self, target: usize, relas: &[Rela]) -> usize {
        let mut data = Vec::new();
        for rela in relas {
            data.write_u32::<BigEndian>(rela.offset).unwrap();
            data.write_u32::<BigEndian>((rela.sym << 8) | (rela.r_type & 0xff))
                .unwrap();
            data.write_i32::<BigEndian>(rela.addend).unwrap();
        }
        self.add(SectionDesc {
            sh_type: SHT_RELA,
            flags: 0,
            data,
            link: 0,
            info: target as u32,
            entsize: RELA_SIZE as u32,
        })
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = vec![0u8; EHDR_SIZE];
        let mut offsets = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            align4(&mut buf);
            offsets.push(buf.len() as u32);
            buf.extend_from_slice(&section.data);
        }
        align4(&mut buf);
        let shoff = buf.len() as u32;

        for (idx, (section, offset)) in self.sections.iter().zip(offsets).enumerate() {
            buf.write_u32::<BigEndian>(0).unwrap();
            buf.write_u32::<BigEndian>(section.sh_type).unwrap();
            buf.write_u32::<BigEndian>(section.flags).unwrap();
            buf.write_u32::<BigEndian>(0).unwrap();
            buf.write_u32::<BigEndian>(if idx == 0 { 0 } else { offset })
                .unwrap();
            buf.write_u32::<BigEndian>(section.data.len() as u32)
                .unwrap();
            buf.write_u32::<BigEndian>(section.link).unwrap();
            buf.write_u32::<BigEndian>(section.info).unwrap();
            buf.write_u32::<BigEndian>(4).unwrap();
            buf.write_u32::<BigEndian>(section.entsize).unwrap();
        }

        let mut ehdr = Vec::with_capacity(EHDR_SIZE);
        ehdr.extend_from_slice(&ELFMAGIC);
        ehdr.extend_from_slice(&[ELFCLASS32, ELFDATA2MSB, EV_CURRENT]);
        ehdr.resize(16, 0);
        ehdr.write_u16::<BigEndian>(ET_REL).unwrap();
        ehdr.write_u16::<BigEndian>(EM_PPC).unwrap();
        ehdr.write_u32::<BigEndian>(EV_CURRENT as u32).unwrap();
        ehdr.write_u32::<BigEndian>(0).unwrap(); // e_entry
        ehdr.write_u32::<BigEndian>(0).unwrap(); // e_phoff
        ehdr.write_u32::<BigEndian>(shoff).unwrap();
        ehdr.write_u32::<BigEndian>(0).unwrap(); // e_flags
        ehdr.write_u16::<BigEndian>(EHDR_SIZE as u16).unwrap();
        ehdr.write_u16::<BigEndian>(0).unwrap();
        ehdr.write_u16::<BigEndian>(0).unwrap();
        ehdr.write_u16::<BigEndian>(SHDR_SIZE as u16).unwrap();
        ehdr.write_u16::<BigEndian>(self.sections.len() as u16)
            .unwrap();
        ehdr.write_u16::<BigEndian>(0).unwrap();
        buf[..EHDR_SIZE].copy_from_slice(&ehdr);
        buf
    }
}

fn align4(buf: &mut Vec<u8>) {
    let len = (buf.len() + 3) & !3;
    buf.resize(len, 0);
}

/// Builds `[null, .text, .symtab, .rela.text]` with a `.text` of `text_size` bytes.
pub fn text_object(text_size: usize, syms: &[Sym], relas: &[Rela]) -> Vec<u8> {
    let mut builder = ObjectBuilder::new();
    let text = builder.progbits(text_size);
    builder.symtab(syms);
    builder.rela(text, relas);
    builder.build()
}

/// Relocates `bytes` into a single `.text` segment loaded at [`TEXT_ADDR`].
pub fn relocate_text(bytes: &[u8], text: &mut [u8]) -> elf_dl::Result<()> {
    let mut module = Module::new("test");
    module.push(Segment::new(TEXT_IDX, TEXT_ADDR, text));
    apply_relocations(&mut module, bytes)
}

pub fn patch(bytes: &mut [u8], offset: usize, width: usize, val: u32) {
    match width {
        1 => bytes[offset] = val as u8,
        2 => BigEndian::write_u16(&mut bytes[offset..offset + 2], val as u16),
        4 => BigEndian::write_u32(&mut bytes[offset..offset + 4], val),
        _ => panic!("unsupported field width {width}"),
    }
}

/// Overwrites a field of section header `idx` in a built object.
pub fn patch_shdr(bytes: &mut [u8], idx: usize, field: usize, val: u32) {
    let shoff = BigEndian::read_u32(&bytes[32..36]) as usize;
    patch(bytes, shoff + idx * SHDR_SIZE + field, 4, val);
}

pub fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    BigEndian::read_u32(&bytes[offset..offset + 4])
}

pub fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    BigEndian::read_u16(&bytes[offset..offset + 2])
}

pub fn write_u32(bytes: &mut [u8], offset: usize, val: u32) {
    BigEndian::write_u32(&mut bytes[offset..offset + 4], val);
}
