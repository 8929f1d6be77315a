//! Lays out the allocated sections of a PowerPC relocatable object and
//! applies its relocations, the way a boot-time module loader would.
//!
//! Symbol values are used as found in the object; a real loader resolves them
//! before this step.
use elf_dl::{
    ElfObject, Module, Segment,
    elf::{SHF_ALLOC, SHT_NOBITS},
    is_valid_header,
};
use std::{env, fs, process};

const LOAD_BASE: u32 = 0x0010_0000;

fn main() {
    unsafe { env::set_var("RUST_LOG", "trace") };
    env_logger::init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: relocate_object <object.o>");
        process::exit(2);
    };
    let bytes = fs::read(&path).unwrap();
    if !is_valid_header(&bytes) {
        eprintln!("{path}: not a PowerPC relocatable object");
        process::exit(1);
    }
    let object = ElfObject::parse(&bytes).unwrap();

    // one buffer per allocated section, placed back to back
    let mut layout = Vec::new();
    let mut addr = LOAD_BASE;
    for (idx, shdr) in object.shdrs().as_slice().iter().enumerate() {
        if shdr.sh_flags() & SHF_ALLOC as u32 == 0 {
            continue;
        }
        let align = shdr.sh_addralign().max(1);
        addr = addr.next_multiple_of(align);
        let memory = if shdr.sh_type() == SHT_NOBITS {
            vec![0u8; shdr.sh_size()]
        } else {
            object.section_data(shdr).unwrap().to_vec()
        };
        layout.push((idx, addr, memory));
        addr += shdr.sh_size() as u32;
    }

    let mut module = Module::new(path.as_str());
    for (idx, addr, memory) in layout.iter_mut() {
        module.push(Segment::new(*idx, *addr, memory));
    }
    object.relocator().relocate(&mut module).unwrap();
    for segment in module.segments() {
        println!(
            "section {:>3} at {:#010x}: {} bytes",
            segment.section(),
            segment.addr(),
            segment.size()
        );
    }
}
