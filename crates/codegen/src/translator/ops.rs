//! Per-instruction dispatch.

use lyra_contract::script::{push_data_prefix, push_int_encoding};
use lyra_contract::Opcode;
use lyra_ir::IrOp;

use super::{MethodCtx, Translator};
use crate::error::{CodegenError, Result};
use crate::fixup::FixupKind;

impl Translator<'_> {
    pub(super) fn translate_op(
        &mut self,
        ctx: &mut MethodCtx,
        method_id: &str,
        op: &IrOp,
    ) -> Result<()> {
        use IrOp::*;
        match op {
            PushInt { value } => push_int(ctx, *value),
            PushData { bytes } => push_data(ctx, method_id, bytes)?,
            PushString { value } => push_data(ctx, method_id, value.as_bytes())?,
            PushBool { value } => {
                let opcode = if *value { Opcode::PushN(1) } else { Opcode::Push0 };
                ctx.method.emit_op(opcode);
            }
            PushNull => {
                ctx.method.emit_op(Opcode::Push0);
            }

            LoadLocal { slot } => {
                slot_access(ctx, method_id, *slot, Opcode::load_local, Opcode::LdLoc)?
            }
            StoreLocal { slot } => {
                slot_access(ctx, method_id, *slot, Opcode::store_local, Opcode::StLoc)?
            }
            LoadArg { slot } => {
                slot_access(ctx, method_id, *slot, Opcode::load_arg, Opcode::LdArg)?
            }
            StoreArg { slot } => {
                slot_access(ctx, method_id, *slot, Opcode::store_arg, Opcode::StArg)?
            }

            Dup => drop_in(ctx, Opcode::Dup),
            Drop => drop_in(ctx, Opcode::Drop),
            Swap => drop_in(ctx, Opcode::Swap),

            Add => drop_in(ctx, Opcode::Add),
            Sub => drop_in(ctx, Opcode::Sub),
            Mul => drop_in(ctx, Opcode::Mul),
            Div => drop_in(ctx, Opcode::Div),
            Rem => drop_in(ctx, Opcode::Mod),
            Neg => drop_in(ctx, Opcode::Neg),
            Shl => drop_in(ctx, Opcode::Shl),
            Shr => drop_in(ctx, Opcode::Shr),
            BitAnd => drop_in(ctx, Opcode::And),
            BitOr => drop_in(ctx, Opcode::Or),
            BitXor => drop_in(ctx, Opcode::Xor),
            BitNot => drop_in(ctx, Opcode::Not),

            Eq => drop_in(ctx, Opcode::Equal),
            Ne => drop_in(ctx, Opcode::NotEqual),
            Lt => drop_in(ctx, Opcode::Lt),
            Le => drop_in(ctx, Opcode::Le),
            Gt => drop_in(ctx, Opcode::Gt),
            Ge => drop_in(ctx, Opcode::Ge),

            Jump { target } => branch(ctx, Opcode::Jmp, *target),
            JumpIf { target } => branch(ctx, Opcode::JmpIf, *target),
            JumpIfNot { target } => branch(ctx, Opcode::JmpIfNot, *target),
            JumpEq { target } => branch(ctx, Opcode::JmpEq, *target),
            JumpNe { target } => branch(ctx, Opcode::JmpNe, *target),
            JumpGt { target } => branch(ctx, Opcode::JmpGt, *target),
            JumpGe { target } => branch(ctx, Opcode::JmpGe, *target),
            JumpLt { target } => branch(ctx, Opcode::JmpLt, *target),
            JumpLe { target } => branch(ctx, Opcode::JmpLe, *target),

            Ret | RetValue => drop_in(ctx, Opcode::Ret),
            Abort => drop_in(ctx, Opcode::Abort),

            Call { target } => self.translate_call(ctx, method_id, target)?,
            Emit { event, args } => self.emit_event(ctx, method_id, event, *args)?,

            New { class } => self.construct_record(ctx, method_id, class)?,
            GetField { index } => {
                push_int(ctx, i128::from(*index));
                ctx.method.emit_op(Opcode::PickItem);
            }
            SetField { index } => {
                // Stack is [record, value]; bring the index underneath the
                // value for SETITEM's (record, index, value) order.
                push_int(ctx, i128::from(*index));
                ctx.method.emit_op(Opcode::Swap);
                ctx.method.emit_op(Opcode::SetItem);
            }
            NewArray => drop_in(ctx, Opcode::NewArray),
            ArrayGet => drop_in(ctx, Opcode::PickItem),
            ArraySet => drop_in(ctx, Opcode::SetItem),
            ArrayLen => drop_in(ctx, Opcode::Size),
            Concat => drop_in(ctx, Opcode::Cat),

            Other { name } => {
                return Err(CodegenError::UnsupportedInstruction {
                    method: method_id.to_string(),
                    name: name.clone(),
                })
            }
        }
        Ok(())
    }

    fn construct_record(
        &mut self,
        ctx: &mut MethodCtx,
        method_id: &str,
        class_name: &str,
    ) -> Result<()> {
        let class = self.walk.class(class_name).ok_or_else(|| {
            CodegenError::NotARecord {
                method: method_id.to_string(),
                class: class_name.to_string(),
            }
        })?;
        if !class.is_record() {
            return Err(CodegenError::NotARecord {
                method: method_id.to_string(),
                class: class_name.to_string(),
            });
        }
        // Field values are already on the stack in declaration order.
        push_int(ctx, class.fields.len() as i128);
        ctx.method.emit_op(Opcode::PackStruct);
        Ok(())
    }
}

fn drop_in(ctx: &mut MethodCtx, opcode: Opcode) {
    ctx.method.emit_op(opcode);
}

pub(super) fn push_int(ctx: &mut MethodCtx, value: i128) {
    let (opcode, operand) = push_int_encoding(value);
    ctx.method.emit(opcode, &operand);
}

pub(super) fn push_data(ctx: &mut MethodCtx, method_id: &str, data: &[u8]) -> Result<()> {
    // push_data_prefix only fails on oversized data.
    let (opcode, prefix) = push_data_prefix(data.len()).map_err(|_| {
        CodegenError::DataTooLong { method: method_id.to_string(), len: data.len() }
    })?;
    let mut operand = prefix;
    operand.extend_from_slice(data);
    ctx.method.emit(opcode, &operand);
    Ok(())
}

fn slot_access(
    ctx: &mut MethodCtx,
    method_id: &str,
    slot: u16,
    dedicated: fn(u8) -> Option<Opcode>,
    generic: Opcode,
) -> Result<()> {
    if slot > 255 {
        return Err(CodegenError::SlotOutOfRange {
            method: method_id.to_string(),
            slot,
        });
    }
    match dedicated(slot as u8) {
        Some(opcode) => {
            ctx.method.emit_op(opcode);
        }
        None => {
            ctx.method.emit(generic, &[slot as u8]);
        }
    }
    Ok(())
}

fn branch(ctx: &mut MethodCtx, opcode: Opcode, target: u32) {
    let label = ctx.labels[&target];
    let insn = ctx.method.emit(opcode, &[0, 0, 0, 0]);
    ctx.fixups.push((insn, FixupKind::Branch { label }));
}
