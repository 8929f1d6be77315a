use crate::{
    Result,
    arch::Arch,
    elf::{SHT_RELA, SHT_SYMTAB, SymbolTable},
    error::{missing_symtab, out_of_range, unsupported},
    object::ElfObject,
    relocation::{RelocationContext, RelocationHandler, reloc_msg},
    segment::Module,
};
use alloc::format;

impl<'data, A: Arch> ElfObject<'data, A> {
    /// Resolves the symbol table, or fails before anything was written.
    fn module_symtab(&self, module: &str) -> Result<SymbolTable<'data, A::Endian>> {
        if self.shdrs().find(SHT_SYMTAB).is_none() {
            return Err(missing_symtab(format!(
                "module {module} has no SHT_SYMTAB section"
            )));
        }
        self.symtab()
    }

    pub(crate) fn relocate_impl<PreH, PostH>(
        &self,
        module: &mut Module<'_>,
        pre_handler: &mut PreH,
        post_handler: &mut PostH,
        strict: bool,
    ) -> Result<()>
    where
        PreH: RelocationHandler + ?Sized,
        PostH: RelocationHandler + ?Sized,
    {
        let symtab = self.module_symtab(&module.name)?;
        let Module { name, segments } = module;
        let name = name.as_str();

        for (_, shdr) in self.shdrs().iter_type(SHT_RELA) {
            let target = shdr.sh_info();
            let Some(segment) = segments.iter_mut().find(|seg| seg.section() == target) else {
                #[cfg(feature = "log")]
                log::debug!("[{}] section {} is not loaded, skipping its relocations", name, target);
                continue;
            };
            let relas = self.rela_table(shdr)?;
            #[cfg(feature = "log")]
            log::debug!(
                "[{}] applying {} relocations to section {} at {:#x}",
                name,
                relas.len(),
                target,
                segment.addr()
            );

            for rela in relas.iter() {
                if !segment.contains(rela.r_offset()) {
                    return Err(out_of_range(format!(
                        "module: {}, relocation type: {}, offset {:#x} is outside section {} ({:#x} bytes)",
                        name,
                        A::rel_type_to_str(rela.r_type()),
                        rela.r_offset(),
                        target,
                        segment.size()
                    )));
                }
                let symbol = symtab.symbol(rela.r_symbol())?;
                let mut ctx = RelocationContext::new(name, &rela, &symbol, &mut *segment);

                if let Some(res) = pre_handler.handle(&mut ctx) {
                    res?;
                    continue;
                }
                if A::relocate(&mut ctx)? {
                    continue;
                }
                if let Some(res) = post_handler.handle(&mut ctx) {
                    res?;
                    continue;
                }
                if strict {
                    return Err(unsupported(reloc_msg::<A>(
                        &ctx,
                        "relocation type is not supported",
                    )));
                }
                #[cfg(feature = "log")]
                log::warn!(
                    "[{}] ignoring relocation type {} at offset {:#x} in section {}",
                    name,
                    rela.r_type(),
                    rela.r_offset(),
                    target
                );
            }
        }
        Ok(())
    }
}
