//! Entry-point rules, slot limits, and method prologues.

use lyra_contract::Opcode;
use lyra_ir::{Annotation, IrLocal, IrOp, MethodRef, MethodSig, TypeSig};

use crate::error::CodegenError;
use crate::tests::helpers::{class, compile_single, decode, entry, method, opcodes, void_sig};

#[test]
fn missing_entry_point_fails() {
    let c = class("demo.T", vec![method("helper", void_sig(), vec![IrOp::Ret])]);
    match compile_single(c) {
        Err(CodegenError::NoEntryPoint { class }) => assert_eq!(class, "demo.T"),
        other => panic!("expected NoEntryPoint, got {other:?}"),
    }
}

#[test]
fn duplicate_entry_points_fail_before_translation() {
    let mut first = entry(vec![IrOp::Ret]);
    first.name = "a".into();
    let mut second = entry(vec![IrOp::Other { name: "junk".into() }]);
    second.name = "b".into();

    // The second body is untranslatable, so reaching translation at all
    // would surface a different error.
    match compile_single(class("demo.T", vec![first, second])) {
        Err(CodegenError::MultipleEntryPoints { first, second, .. }) => {
            assert_eq!(first, "demo.T.a()void");
            assert_eq!(second, "demo.T.b()void");
        }
        other => panic!("expected MultipleEntryPoints, got {other:?}"),
    }
}

#[test]
fn slotless_method_skips_the_prologue() {
    let artifacts = compile_single(class("demo.T", vec![entry(vec![IrOp::Ret])])).unwrap();
    assert_eq!(artifacts.lef.script, vec![Opcode::Ret.code()]);
}

#[test]
fn prologue_operand_is_locals_then_params() {
    let mut m = entry(vec![IrOp::Ret]);
    m.sig = MethodSig::new(vec![TypeSig::Int], TypeSig::Void);
    m.locals = vec![
        IrLocal { name: "a".into(), ty: TypeSig::Int },
        IrLocal { name: "b".into(), ty: TypeSig::Int },
        IrLocal { name: "c".into(), ty: TypeSig::Int },
    ];
    let artifacts = compile_single(class("demo.T", vec![m])).unwrap();
    let insns = decode(&artifacts.lef.script);
    assert_eq!(insns[0], (Opcode::InitSlot.code(), vec![3, 1]));
}

#[test]
fn slot_limit_is_enforced() {
    let mut m = entry(vec![IrOp::Ret]);
    m.locals = (0..256)
        .map(|i| IrLocal { name: format!("l{i}"), ty: TypeSig::Int })
        .collect();
    match compile_single(class("demo.T", vec![m])) {
        Err(CodegenError::TooManyLocals { count, .. }) => assert_eq!(count, 256),
        other => panic!("expected TooManyLocals, got {other:?}"),
    }

    let mut m = entry(vec![IrOp::Ret]);
    m.sig = MethodSig::new(vec![TypeSig::Int; 256], TypeSig::Void);
    match compile_single(class("demo.T", vec![m])) {
        Err(CodegenError::TooManyParameters { count, .. }) => assert_eq!(count, 256),
        other => panic!("expected TooManyParameters, got {other:?}"),
    }
}

#[test]
fn low_slots_use_dedicated_opcodes() {
    let mut m = entry(vec![
        IrOp::LoadLocal { slot: 0 },
        IrOp::LoadLocal { slot: 6 },
        IrOp::LoadLocal { slot: 7 },
        IrOp::StoreLocal { slot: 200 },
        IrOp::Ret,
    ]);
    m.locals = (0..201)
        .map(|i| IrLocal { name: format!("l{i}"), ty: TypeSig::Any })
        .collect();
    let artifacts = compile_single(class("demo.T", vec![m])).unwrap();
    let insns = decode(&artifacts.lef.script);

    assert_eq!(insns[1], (Opcode::LdLoc0.code(), vec![]));
    assert_eq!(insns[2], (Opcode::LdLoc6.code(), vec![]));
    assert_eq!(insns[3], (Opcode::LdLoc.code(), vec![7]));
    assert_eq!(insns[4], (Opcode::StLoc.code(), vec![200]));
}

#[test]
fn out_of_range_slot_fails() {
    let m = entry(vec![IrOp::LoadArg { slot: 300 }, IrOp::Ret]);
    match compile_single(class("demo.T", vec![m])) {
        Err(CodegenError::SlotOutOfRange { slot, .. }) => assert_eq!(slot, 300),
        other => panic!("expected SlotOutOfRange, got {other:?}"),
    }
}

#[test]
fn safe_marker_on_a_private_method_fails() {
    let target = MethodRef { class: "demo.T".into(), method: "helper".into(), sig: void_sig() };
    let main = entry(vec![IrOp::Call { target }, IrOp::Ret]);
    let mut helper = method("helper", void_sig(), vec![IrOp::Ret]);
    helper.annotations.push(Annotation::Safe);

    match compile_single(class("demo.T", vec![main, helper])) {
        Err(CodegenError::SafeOnPrivateMethod { method }) => {
            assert_eq!(method, "demo.T.helper()void");
        }
        other => panic!("expected SafeOnPrivateMethod, got {other:?}"),
    }
}

#[test]
fn jump_past_the_body_names_the_method() {
    // Index 2 (just past the last instruction) is a valid target, 3 is not.
    let ok = entry(vec![IrOp::Jump { target: 2 }, IrOp::Ret]);
    assert!(compile_single(class("demo.T", vec![ok])).is_ok());

    let bad = entry(vec![IrOp::Jump { target: 3 }, IrOp::Ret]);
    match compile_single(class("demo.T", vec![bad])) {
        Err(CodegenError::JumpOutOfRange { method, target }) => {
            assert_eq!(method, "demo.T.main()void");
            assert_eq!(target, 3);
        }
        other => panic!("expected JumpOutOfRange, got {other:?}"),
    }
}

#[test]
fn recursion_terminates_and_compiles_once() {
    let this = MethodRef { class: "demo.T".into(), method: "main".into(), sig: void_sig() };
    let other = MethodRef { class: "demo.T".into(), method: "helper".into(), sig: void_sig() };
    let main = entry(vec![
        IrOp::Call { target: this.clone() },
        IrOp::Call { target: other.clone() },
        IrOp::Ret,
    ]);
    // Mutual recursion back into the entry point.
    let helper = method("helper", void_sig(), vec![IrOp::Call { target: this }, IrOp::Ret]);
    let artifacts = compile_single(class("demo.T", vec![main, helper])).unwrap();

    assert_eq!(artifacts.debug.methods.len(), 2);
    // main: CALL CALL RET = 11 bytes; both self-calls point back to 0.
    let decoded = decode(&artifacts.lef.script);
    assert_eq!(decoded[0], (Opcode::Call.code(), 0u32.to_le_bytes().to_vec()));
    assert_eq!(decoded[1], (Opcode::Call.code(), 11u32.to_le_bytes().to_vec()));
    assert_eq!(decoded[3], (Opcode::Call.code(), 0u32.to_le_bytes().to_vec()));
}

#[test]
fn unsupported_instruction_names_the_method() {
    let m = entry(vec![IrOp::Other { name: "invoke_dynamic".into() }]);
    match compile_single(class("demo.T", vec![m])) {
        Err(CodegenError::UnsupportedInstruction { method, name }) => {
            assert_eq!(method, "demo.T.main()void");
            assert_eq!(name, "invoke_dynamic");
        }
        other => panic!("expected UnsupportedInstruction, got {other:?}"),
    }
}

#[test]
fn returns_and_aborts_lower_directly() {
    let m = entry(vec![
        IrOp::PushBool { value: true },
        IrOp::JumpIf { target: 3 },
        IrOp::Abort,
        IrOp::PushInt { value: 5 },
        IrOp::RetValue,
    ]);
    let artifacts = compile_single(class("demo.T", vec![m])).unwrap();
    let ops = opcodes(&artifacts.lef.script);
    assert_eq!(
        ops,
        vec![
            Opcode::PushN(1).code(),
            Opcode::JmpIf.code(),
            Opcode::Abort.code(),
            Opcode::PushN(5).code(),
            Opcode::Ret.code(),
        ]
    );
}
