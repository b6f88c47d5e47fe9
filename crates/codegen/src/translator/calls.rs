//! Call-site emission: ordinary calls, syscalls, external contract calls,
//! fixed instruction sequences, and event notifications.

use lyra_contract::interop;
use lyra_contract::{CallFlags, MethodToken, Opcode};
use lyra_ir::MethodRef;

use super::ops::{push_data, push_int};
use super::{MethodCtx, Translator};
use crate::error::{CodegenError, Result};
use crate::fixup::FixupKind;
use crate::walker::MethodKind;

const NOTIFY_SERVICE: &str = "System.Runtime.Notify";

impl Translator<'_> {
    pub(super) fn translate_call(
        &mut self,
        ctx: &mut MethodCtx,
        method_id: &str,
        target: &MethodRef,
    ) -> Result<()> {
        let callee = target.id();
        let kind = self
            .walk
            .kind(&callee)
            .ok_or_else(|| CodegenError::UnresolvedCall { callee: callee.clone() })?
            .clone();

        match kind {
            MethodKind::Ordinary => {
                let insn = ctx.method.emit(Opcode::Call, &[0, 0, 0, 0]);
                ctx.fixups.push((insn, FixupKind::Call { callee }));
            }
            MethodKind::Syscall { service } => {
                self.enter_native(ctx, target.sig.params.len());
                ctx.method.emit(Opcode::Syscall, &service.id());
            }
            MethodKind::ContractCall { hash, method, params, has_return } => {
                let token = MethodToken {
                    hash,
                    method,
                    params_count: params,
                    has_return,
                    call_flags: CallFlags::ALL,
                };
                let index = self.module.token_index(token)?;
                self.enter_native(ctx, params as usize);
                ctx.method.emit(Opcode::CallT, &index.to_le_bytes());
            }
            MethodKind::HashLiteral { hash } => {
                push_data(ctx, method_id, hash.as_bytes())?;
            }
            MethodKind::FixedSequence { insns } => {
                for (opcode, operand) in &insns {
                    ctx.method.emit(*opcode, operand);
                }
            }
        }
        Ok(())
    }

    /// Prelude at every native boundary: an alignment `NOP`, then the
    /// argument reordering the callee's calling convention expects.
    fn enter_native(&mut self, ctx: &mut MethodCtx, argc: usize) {
        ctx.method.emit_op(Opcode::Nop);
        match argc {
            0 | 1 => {}
            2 => {
                ctx.method.emit_op(Opcode::Swap);
            }
            3 => {
                ctx.method.emit_op(Opcode::Reverse3);
            }
            4 => {
                ctx.method.emit_op(Opcode::Reverse4);
            }
            n => {
                push_int(ctx, n as i128);
                ctx.method.emit_op(Opcode::ReverseN);
            }
        }
    }

    /// Events pack their arguments into an array and notify the runtime
    /// with the event name.
    pub(super) fn emit_event(
        &mut self,
        ctx: &mut MethodCtx,
        method_id: &str,
        event: &str,
        args: u8,
    ) -> Result<()> {
        let notify = interop::lookup(NOTIFY_SERVICE).ok_or_else(|| {
            CodegenError::UnknownSyscall {
                method: method_id.to_string(),
                service: NOTIFY_SERVICE.to_string(),
            }
        })?;
        push_int(ctx, i128::from(args));
        ctx.method.emit_op(Opcode::Pack);
        push_data(ctx, method_id, event.as_bytes())?;
        // (state, name) on the stack; the service takes (name, state).
        ctx.method.emit_op(Opcode::Nop);
        ctx.method.emit_op(Opcode::Swap);
        ctx.method.emit(Opcode::Syscall, &notify.id());
        Ok(())
    }
}
