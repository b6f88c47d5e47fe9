//! Call-site lowering: syscalls, contract calls, fixed sequences, and
//! ordinary calls.

use lyra_contract::{CallFlags, Opcode};
use lyra_ir::{Annotation, IrOp, MethodRef, MethodSig, TypeSig};

use crate::error::CodegenError;
use crate::tests::helpers::{
    class, compile_classes, decode, entry, method, opcodes, void_sig,
};
use crate::walker::syscall_fixed_price;

const HASH_HEX: &str = "0x00112233445566778899aabbccddeeff00112233";

fn native_sig(params: usize) -> MethodSig {
    MethodSig::new(vec![TypeSig::Any; params], TypeSig::Void)
}

/// A class with one method bound to an interop service.
fn native_class(service: &str, params: usize) -> (lyra_ir::IrClass, MethodRef) {
    let mut m = method("invoke", native_sig(params), vec![]);
    m.annotations.push(Annotation::Syscall { service: service.to_string() });
    let c = class("sys.Native", vec![m]);
    let target = MethodRef {
        class: "sys.Native".into(),
        method: "invoke".into(),
        sig: native_sig(params),
    };
    (c, target)
}

fn args(n: usize) -> Vec<IrOp> {
    (0..n).map(|i| IrOp::PushInt { value: i as i128 }).collect()
}

#[test]
fn syscall_reordering_by_arity() {
    let cases: [(usize, Vec<u8>); 5] = [
        (1, vec![]),
        (2, vec![Opcode::Swap.code()]),
        (3, vec![Opcode::Reverse3.code()]),
        (4, vec![Opcode::Reverse4.code()]),
        (5, vec![Opcode::PushN(5).code(), Opcode::ReverseN.code()]),
    ];
    for (arity, reorder) in cases {
        let (native, target) = native_class("System.Storage.Get", arity);
        let mut insns = args(arity);
        insns.push(IrOp::Call { target });
        insns.push(IrOp::Ret);
        let artifacts =
            compile_classes("demo.T", vec![class("demo.T", vec![entry(insns)]), native])
                .unwrap();

        // Arg 0 pushes PUSH0, the rest PUSH1 and up.
        let mut expected = vec![Opcode::Push0.code()];
        expected.extend((1..arity).map(|i| Opcode::PushN(i as u8).code()));
        expected.push(Opcode::Nop.code());
        expected.extend(&reorder);
        expected.push(Opcode::Syscall.code());
        expected.push(Opcode::Ret.code());
        assert_eq!(opcodes(&artifacts.lef.script), expected, "arity {arity}");
    }
}

#[test]
fn syscall_operand_is_the_service_id() {
    let (native, target) = native_class("System.Runtime.GetTime", 0);
    let insns = vec![IrOp::Call { target }, IrOp::Ret];
    let artifacts =
        compile_classes("demo.T", vec![class("demo.T", vec![entry(insns)]), native]).unwrap();

    let decoded = decode(&artifacts.lef.script);
    let expected = lyra_contract::interop::lookup("System.Runtime.GetTime").unwrap().id();
    assert_eq!(decoded[1], (Opcode::Syscall.code(), expected.to_vec()));
}

#[test]
fn unknown_service_fails() {
    let (native, target) = native_class("System.Nope", 0);
    let insns = vec![IrOp::Call { target }, IrOp::Ret];
    match compile_classes("demo.T", vec![class("demo.T", vec![entry(insns)]), native]) {
        Err(CodegenError::UnknownSyscall { service, .. }) => {
            assert_eq!(service, "System.Nope");
        }
        other => panic!("expected UnknownSyscall, got {other:?}"),
    }
}

#[test]
fn contract_call_interns_a_token() {
    let mut iface = class("ext.Token", vec![]);
    iface.annotations.push(Annotation::ContractHash { hash: HASH_HEX.into() });
    let target = MethodRef {
        class: "ext.Token".into(),
        method: "transfer".into(),
        sig: MethodSig::new(vec![TypeSig::Hash, TypeSig::Hash, TypeSig::Int, TypeSig::Any], TypeSig::Bool),
    };

    let mut insns = args(4);
    insns.push(IrOp::Call { target: target.clone() });
    insns.push(IrOp::Drop);
    insns.push(IrOp::Ret);
    let artifacts =
        compile_classes("demo.T", vec![class("demo.T", vec![entry(insns)]), iface]).unwrap();

    assert_eq!(artifacts.lef.tokens.len(), 1);
    let token = &artifacts.lef.tokens[0];
    assert_eq!(token.method, "transfer");
    assert_eq!(token.params_count, 4);
    assert!(token.has_return);
    assert_eq!(token.call_flags, CallFlags::ALL);
    assert_eq!(token.hash.to_string(), HASH_HEX);

    let decoded = decode(&artifacts.lef.script);
    let callt = decoded
        .iter()
        .find(|(code, _)| *code == Opcode::CallT.code())
        .expect("no CALLT emitted");
    assert_eq!(callt.1, vec![0, 0]);
    // Reordering prelude directly before the CALLT.
    let ops = opcodes(&artifacts.lef.script);
    let at = ops.iter().position(|&c| c == Opcode::CallT.code()).unwrap();
    assert_eq!(ops[at - 2..at], [Opcode::Nop.code(), Opcode::Reverse4.code()]);
}

#[test]
fn get_hash_pushes_the_interface_hash() {
    let mut iface = class("ext.Token", vec![]);
    iface.annotations.push(Annotation::ContractHash { hash: HASH_HEX.into() });
    let target = MethodRef {
        class: "ext.Token".into(),
        method: "getHash".into(),
        sig: MethodSig::new(vec![], TypeSig::Hash),
    };
    let insns = vec![IrOp::Call { target }, IrOp::Drop, IrOp::Ret];
    let artifacts =
        compile_classes("demo.T", vec![class("demo.T", vec![entry(insns)]), iface]).unwrap();

    let decoded = decode(&artifacts.lef.script);
    // 20 bytes of inline data, no call, no token.
    assert_eq!(decoded[0].0, 20);
    assert_eq!(decoded[0].1.len(), 20);
    assert_eq!(decoded[0].1[..4], [0x00, 0x11, 0x22, 0x33]);
    assert!(artifacts.lef.tokens.is_empty());
}

#[test]
fn fixed_sequences_emit_inline_in_order() {
    let mut m = method("pair", native_sig(0), vec![]);
    m.annotations.push(Annotation::Instruction {
        opcode: Opcode::PushInt8.code(),
        prefix: vec![],
        operand: vec![7],
    });
    m.annotations.push(Annotation::Instruction {
        opcode: Opcode::Drop.code(),
        prefix: vec![],
        operand: vec![],
    });
    let helper = class("sys.Helpers", vec![m]);
    let target = MethodRef {
        class: "sys.Helpers".into(),
        method: "pair".into(),
        sig: native_sig(0),
    };

    let insns = vec![IrOp::Call { target }, IrOp::Ret];
    let artifacts =
        compile_classes("demo.T", vec![class("demo.T", vec![entry(insns)]), helper]).unwrap();

    let decoded = decode(&artifacts.lef.script);
    assert_eq!(decoded[0], (Opcode::PushInt8.code(), vec![7]));
    assert_eq!(decoded[1], (Opcode::Drop.code(), vec![]));
    assert_eq!(decoded[2], (Opcode::Ret.code(), vec![]));
}

#[test]
fn malformed_fixed_instruction_fails() {
    let mut m = method("bad", native_sig(0), vec![]);
    m.annotations.push(Annotation::Instruction {
        opcode: Opcode::PushInt8.code(),
        prefix: vec![],
        operand: vec![1, 2],
    });
    let helper = class("sys.Helpers", vec![m]);
    let target = MethodRef {
        class: "sys.Helpers".into(),
        method: "bad".into(),
        sig: native_sig(0),
    };
    let insns = vec![IrOp::Call { target }, IrOp::Ret];
    match compile_classes("demo.T", vec![class("demo.T", vec![entry(insns)]), helper]) {
        Err(CodegenError::BadInstructionAnnotation { method, .. }) => {
            assert_eq!(method, "sys.Helpers.bad()void");
        }
        other => panic!("expected BadInstructionAnnotation, got {other:?}"),
    }
}

#[test]
fn ordinary_calls_are_patched_to_absolute_addresses() {
    let target = MethodRef { class: "demo.T".into(), method: "helper".into(), sig: void_sig() };
    let main = entry(vec![
        IrOp::Call { target: target.clone() },
        IrOp::Call { target },
        IrOp::Ret,
    ]);
    let helper = method("helper", void_sig(), vec![IrOp::Ret]);
    let artifacts = compile_classes("demo.T", vec![class("demo.T", vec![main, helper])]).unwrap();

    let decoded = decode(&artifacts.lef.script);
    // main: CALL(5) CALL(5) RET(1) = 11 bytes, helper starts at 11.
    assert_eq!(decoded[0], (Opcode::Call.code(), 11u32.to_le_bytes().to_vec()));
    assert_eq!(decoded[1], (Opcode::Call.code(), 11u32.to_le_bytes().to_vec()));
    assert_eq!(decoded[3], (Opcode::Ret.code(), vec![]));
    // Memoized: one compiled copy despite two call sites.
    assert_eq!(artifacts.debug.methods.len(), 2);
}

#[test]
fn fixed_prices_are_only_for_fixed_services() {
    let price = syscall_fixed_price("System.Runtime.GetTime").unwrap();
    assert_eq!(price, 1 << 3);
    assert!(matches!(
        syscall_fixed_price("System.Storage.Put"),
        Err(CodegenError::VariablePriceSyscall { .. })
    ));
    assert!(matches!(
        syscall_fixed_price("System.Nope"),
        Err(CodegenError::UnknownSyscall { .. })
    ));
}
