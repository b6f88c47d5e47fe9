//! The module under compilation: compiled methods in order, the
//! method-token table, and the pending fixup list.

use std::collections::HashMap;

use tracing::debug;

use lyra_contract::MethodToken;

use crate::error::{CodegenError, Result};
use crate::fixup::{Fixup, FixupKind};
use crate::index::{IndexVec, MethodIx, TokenIx};
use crate::method::CompiledMethod;

#[derive(Debug, Default)]
pub struct Module {
    pub methods: IndexVec<MethodIx, CompiledMethod>,
    by_id: HashMap<String, MethodIx>,
    pub tokens: IndexVec<TokenIx, MethodToken>,
    fixups: Vec<Fixup>,
    finalized: bool,
}

impl Module {
    pub fn new() -> Module {
        Module::default()
    }

    pub fn add_method(&mut self, method: CompiledMethod) -> MethodIx {
        let ix = self.methods.len_idx();
        self.by_id.insert(method.id.clone(), ix);
        self.methods.push(method);
        ix
    }

    pub fn lookup(&self, id: &str) -> Option<MethodIx> {
        self.by_id.get(id).copied()
    }

    pub fn add_fixup(&mut self, fixup: Fixup) {
        self.fixups.push(fixup);
    }

    /// Index of an equal token, interning it on first use. `CALLT` carries
    /// the index as a two-byte operand, which caps the table.
    pub fn token_index(&mut self, token: MethodToken) -> Result<u16> {
        if let Some(ix) = self.tokens.iter().position(|t| *t == token) {
            return Ok(ix as u16);
        }
        let ix = self.tokens.len();
        if ix > u16::MAX as usize {
            return Err(CodegenError::TooManyTokens { count: ix + 1 });
        }
        self.tokens.push(token);
        Ok(ix as u16)
    }

    /// Assigns every method its absolute start address and patches all
    /// pending branch and call placeholders.
    pub fn finalize(&mut self) -> Result<()> {
        debug_assert!(!self.finalized, "module finalized twice");

        let mut offset = 0u32;
        for method in self.methods.iter_mut() {
            debug_assert!(method.check_contiguous(), "non-contiguous method body");
            method.start_address = Some(offset);
            offset += method.byte_size();
        }
        debug!(methods = self.methods.len(), script_len = offset, "assigned start addresses");

        for fixup in std::mem::take(&mut self.fixups) {
            self.apply(fixup)?;
        }
        self.finalized = true;
        Ok(())
    }

    fn apply(&mut self, fixup: Fixup) -> Result<()> {
        let patch = match &fixup.kind {
            FixupKind::Branch { label } => {
                let method = &self.methods[fixup.method];
                let insn_addr = method.insns[fixup.insn].address;
                let target = method.label_address(*label).ok_or_else(|| {
                    CodegenError::UnresolvedLabel { method: method.id.clone() }
                })?;
                let distance = i64::from(target) - i64::from(insn_addr);
                let distance = i32::try_from(distance).map_err(|_| {
                    CodegenError::BranchOutOfRange { method: method.id.clone() }
                })?;
                distance.to_le_bytes()
            }
            FixupKind::Call { callee } => {
                let ix = self
                    .lookup(callee)
                    .ok_or_else(|| CodegenError::UnresolvedCall { callee: callee.clone() })?;
                let target = self.methods[ix]
                    .start_address
                    .ok_or_else(|| CodegenError::UnresolvedCall { callee: callee.clone() })?;
                target.to_le_bytes()
            }
        };

        let insn = &mut self.methods[fixup.method].insns[fixup.insn];
        debug_assert_eq!(insn.operand.len(), 4, "fixup on a non-placeholder operand");
        insn.operand.copy_from_slice(&patch);
        Ok(())
    }

    /// The concatenated script. Only meaningful after [`Module::finalize`].
    pub fn script(&self) -> Vec<u8> {
        debug_assert!(self.finalized, "script taken before finalization");
        let total: u32 = self.methods.iter().map(CompiledMethod::byte_size).sum();
        let mut out = Vec::with_capacity(total as usize);
        for method in &self.methods {
            method.encode_into(&mut out);
        }
        out
    }

    pub fn method(&self, ix: MethodIx) -> &CompiledMethod {
        &self.methods[ix]
    }
}
