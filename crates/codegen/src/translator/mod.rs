//! Translation from IR method bodies to LyraVM instructions.

mod calls;
mod ops;

use std::collections::HashMap;

use tracing::debug;

use lyra_contract::Opcode;
use lyra_ir::{MethodRef, ResolveError};

use crate::error::{CodegenError, Result};
use crate::fixup::{Fixup, FixupKind};
use crate::method::{CompiledMethod, LabelId};
use crate::module::Module;
use crate::walker::Walk;

/// Per-method translation state. The compiled method lives here until the
/// body is complete, then moves into the module together with its fixups.
pub(crate) struct MethodCtx {
    pub(crate) method: CompiledMethod,
    /// IR instruction index to branch label.
    pub(crate) labels: HashMap<u32, LabelId>,
    /// Instruction index to pending fixup kind.
    pub(crate) fixups: Vec<(usize, FixupKind)>,
}

pub(crate) struct Translator<'a> {
    pub(crate) walk: &'a Walk,
    pub(crate) module: Module,
}

impl<'a> Translator<'a> {
    pub(crate) fn new(walk: &'a Walk) -> Translator<'a> {
        Translator { walk, module: Module::new() }
    }

    /// Translates every discovered method in compilation order.
    pub(crate) fn translate(mut self) -> Result<Module> {
        for method_ref in &self.walk.order {
            self.translate_method(method_ref)?;
        }
        Ok(self.module)
    }

    fn translate_method(&mut self, method_ref: &MethodRef) -> Result<()> {
        let id = method_ref.id();
        let class = self
            .walk
            .class(&method_ref.class)
            .ok_or_else(|| ResolveError::NotFound(method_ref.class.clone()))?
            .clone();
        let ir_method = class
            .method(&method_ref.method, &method_ref.sig)
            .ok_or_else(|| ResolveError::NotFound(id.clone()))?;

        let params_count = ir_method.sig.params.len();
        if params_count > 255 {
            return Err(CodegenError::TooManyParameters { method: id, count: params_count });
        }
        let locals_count = ir_method.locals.len();
        if locals_count > 255 {
            return Err(CodegenError::TooManyLocals { method: id, count: locals_count });
        }

        let params = ir_method
            .sig
            .params
            .iter()
            .enumerate()
            .map(|(i, ty)| {
                let name = ir_method
                    .params
                    .get(i)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| format!("arg{i}"));
                (name, ty.clone())
            })
            .collect();
        let locals =
            ir_method.locals.iter().map(|l| (l.name.clone(), l.ty.clone())).collect();

        let mut compiled = CompiledMethod::new(
            id.clone(),
            class.name.clone(),
            ir_method.name.clone(),
            ir_method.sig.clone(),
            params,
            locals,
        );
        compiled.is_abi = ir_method.is_public && class.name == self.walk.contract.name;
        compiled.is_safe = ir_method.is_safe();
        // The marker only ever reaches the manifest through ABI methods.
        if compiled.is_safe && !compiled.is_abi {
            return Err(CodegenError::SafeOnPrivateMethod { method: id });
        }

        // Slot initialization prologue, skipped for slotless methods.
        if locals_count > 0 || params_count > 0 {
            compiled.emit(Opcode::InitSlot, &[locals_count as u8, params_count as u8]);
        }

        let mut ctx = MethodCtx { method: compiled, labels: HashMap::new(), fixups: Vec::new() };
        for insn in &ir_method.insns {
            if let Some(target) = insn.op.jump_target() {
                // The position just past the last instruction is a valid
                // target; anything beyond it can never be placed.
                if target as usize > ir_method.insns.len() {
                    return Err(CodegenError::JumpOutOfRange { method: id, target });
                }
                if !ctx.labels.contains_key(&target) {
                    let label = ctx.method.new_label();
                    ctx.labels.insert(target, label);
                }
            }
        }

        for (index, insn) in ir_method.insns.iter().enumerate() {
            if let Some(&label) = ctx.labels.get(&(index as u32)) {
                ctx.method.place_label(label);
            }
            let emitted_at = ctx.method.insns.len();
            self.translate_op(&mut ctx, &id, &insn.op)?;
            if let Some(span) = insn.span {
                if ctx.method.insns.len() > emitted_at {
                    ctx.method.set_span(emitted_at, span);
                }
            }
        }
        // A jump may target the position just past the last instruction.
        if let Some(&label) = ctx.labels.get(&(ir_method.insns.len() as u32)) {
            ctx.method.place_label(label);
        }

        debug!(
            method = %id,
            insns = ctx.method.insns.len(),
            bytes = ctx.method.byte_size(),
            "method translated"
        );

        let MethodCtx { method, fixups, .. } = ctx;
        let ix = self.module.add_method(method);
        for (insn, kind) in fixups {
            self.module.add_fixup(Fixup { method: ix, insn, kind });
        }
        Ok(())
    }
}

/// Translates all walked methods into a fresh module.
pub(crate) fn translate(walk: &Walk) -> Result<Module> {
    Translator::new(walk).translate()
}
