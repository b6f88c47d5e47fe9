//! Whole-pipeline tests over a small token contract.

use std::fs;

use lyra_contract::{ContractHash, LefFile, Opcode};
use lyra_ir::{
    Annotation, IrClass, IrEvent, IrInsn, IrOp, IrParam, MemoryResolver, MethodRef,
    MethodSig, Span, TypeSig,
};

use crate::compiler::{compile, CompileOptions, COMPILER_NAME};
use crate::debug::sourcelookup::SourceLocator;
use crate::tests::helpers::{class, compile_classes, decode, entry, method, void_sig};

const SOURCE_URL: &str = "https://example.com/fancy-token";

fn balance_sig() -> MethodSig {
    MethodSig::new(vec![TypeSig::Hash], TypeSig::Int)
}

/// A contract with an entry point, one safe ABI method and an event.
fn token_contract() -> IrClass {
    let balance_ref = MethodRef {
        class: "demo.Token".into(),
        method: "balanceOf".into(),
        sig: balance_sig(),
    };
    let main = entry(vec![
        IrOp::PushData { bytes: vec![0xAA; 20] },
        IrOp::Call { target: balance_ref },
        IrOp::Drop,
        IrOp::Ret,
    ]);

    let mut balance = method(
        "balanceOf",
        balance_sig(),
        vec![IrOp::PushInt { value: 0 }, IrOp::RetValue],
    );
    balance.is_public = true;
    balance.annotations.push(Annotation::Safe);
    balance.params = vec![IrParam { name: "owner".into(), ty: TypeSig::Hash }];

    let mut contract = class("demo.Token", vec![main, balance]);
    contract.annotations = vec![
        Annotation::DisplayName { name: "FancyToken".into() },
        Annotation::SourceUrl { url: SOURCE_URL.into() },
        Annotation::SupportedStandard { standard: "LRC-17".into() },
        Annotation::Group {
            pub_key: "03b2".into(),
            signature: "c2ln".into(),
        },
        Annotation::Permission {
            contract: "0x0000000000000000000000000000000000000001".into(),
            methods: Some(vec!["onPayment".into()]),
        },
        Annotation::Permission { contract: "*".into(), methods: None },
        Annotation::Trust { contract: "*".into() },
        Annotation::ManifestExtra { key: "Author".into(), value: "alice".into() },
    ];
    contract.events.push(IrEvent {
        name: "Transfer".into(),
        params: vec![
            IrParam { name: "to".into(), ty: TypeSig::Hash },
            IrParam { name: "amount".into(), ty: TypeSig::Int },
        ],
    });
    contract
}

#[test]
fn token_contract_end_to_end() {
    let artifacts = compile_classes("demo.Token", vec![token_contract()]).unwrap();

    // Container: round-trips and carries the declared source URL.
    assert_eq!(artifacts.lef.compiler, COMPILER_NAME);
    assert_eq!(artifacts.lef.source, SOURCE_URL);
    let parsed = LefFile::from_bytes(&artifacts.lef.to_bytes()).unwrap();
    assert_eq!(parsed, artifacts.lef);

    // Script hash covers the script alone.
    assert_eq!(artifacts.script_hash, ContractHash::of_script(&artifacts.lef.script));
    assert_eq!(artifacts.debug.hash, artifacts.script_hash.to_string());

    // main: PUSHDATA(21) CALL(5) DROP(1) RET(1) = 28 bytes.
    let manifest = serde_json::to_value(&artifacts.manifest).unwrap();
    assert_eq!(manifest["name"], "FancyToken");
    assert_eq!(manifest["supportedstandards"], serde_json::json!(["LRC-17"]));
    assert_eq!(manifest["groups"][0]["pubkey"], "03b2");
    assert_eq!(manifest["permissions"][0]["methods"], serde_json::json!(["onPayment"]));
    assert_eq!(manifest["permissions"][1]["methods"], "*");
    assert_eq!(manifest["trusts"], "*");
    assert_eq!(manifest["extra"]["Author"], "alice");

    let methods = &manifest["abi"]["methods"];
    assert_eq!(methods[0]["name"], "main");
    assert_eq!(methods[0]["offset"], 0);
    assert_eq!(methods[0]["safe"], false);
    assert_eq!(methods[1]["name"], "balanceOf");
    assert_eq!(methods[1]["offset"], 28);
    assert_eq!(methods[1]["safe"], true);
    assert_eq!(methods[1]["returntype"], "integer");
    assert_eq!(methods[1]["parameters"][0]["name"], "owner");
    assert_eq!(methods[1]["parameters"][0]["type"], "hash");

    let events = &manifest["abi"]["events"];
    assert_eq!(events[0]["name"], "Transfer");
    assert_eq!(events[0]["parameters"][1]["type"], "integer");

    // The CALL operand is balanceOf's absolute start address.
    let decoded = decode(&artifacts.lef.script);
    assert_eq!(decoded[1], (Opcode::Call.code(), 28u32.to_le_bytes().to_vec()));
}

#[test]
fn branch_operands_are_relative_to_the_branch() {
    let m = entry(vec![
        IrOp::PushBool { value: true },
        IrOp::JumpIf { target: 3 },
        IrOp::Abort,
        IrOp::Ret,
    ]);
    let artifacts = compile_classes("demo.T", vec![class("demo.T", vec![m])]).unwrap();

    // PUSH1 at 0, JMPIF at 1, ABORT at 6, RET at 7: distance 7 - 1 = 6.
    let decoded = decode(&artifacts.lef.script);
    assert_eq!(decoded[1], (Opcode::JmpIf.code(), 6i32.to_le_bytes().to_vec()));
}

#[test]
fn backward_branches_encode_negative_distances() {
    let m = entry(vec![
        IrOp::PushInt { value: 1 },
        IrOp::Drop,
        IrOp::Jump { target: 0 },
    ]);
    let artifacts = compile_classes("demo.T", vec![class("demo.T", vec![m])]).unwrap();

    // PUSH1 at 0, DROP at 1, JMP at 2: distance 0 - 2 = -2.
    let decoded = decode(&artifacts.lef.script);
    assert_eq!(decoded[2], (Opcode::Jmp.code(), (-2i32).to_le_bytes().to_vec()));
}

#[test]
fn sequence_points_reference_the_document_table() {
    let span = |line| Span { line, col: 5, end_line: line, end_col: 20 };
    let helper_ref = MethodRef {
        class: "demo.util.Math".into(),
        method: "noop".into(),
        sig: void_sig(),
    };

    let mut main = entry(vec![]);
    main.insns = vec![
        IrInsn::with_span(IrOp::PushInt { value: 7 }, span(3)),
        IrInsn::new(IrOp::Drop),
        IrInsn::with_span(IrOp::Call { target: helper_ref }, span(4)),
        IrInsn::new(IrOp::Ret),
    ];
    let contract = class("demo.Token", vec![main]);

    let mut noop = method("noop", void_sig(), vec![]);
    noop.insns = vec![IrInsn::with_span(IrOp::Ret, span(9))];
    let util = class("demo.util.Math", vec![noop]);

    let dir = tempfile::tempdir().unwrap();
    for rel in ["demo/Token.lyra", "demo/util/Math.lyra"] {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
    }

    let resolver = MemoryResolver::new(vec![contract, util]);
    let options = CompileOptions {
        source_locators: vec![SourceLocator::dir(dir.path(), "lyra")],
        ..CompileOptions::default()
    };
    let artifacts = compile(&resolver, "demo.Token", &options).unwrap();

    assert_eq!(artifacts.debug.documents.len(), 2);
    assert!(artifacts.debug.documents[0].ends_with("Token.lyra"));
    assert!(artifacts.debug.documents[1].ends_with("Math.lyra"));

    // main: PUSH7 at 0, DROP at 1, CALL at 2, RET at 7. noop starts at 8.
    let main = &artifacts.debug.methods[0];
    assert_eq!(main.name, "demo.Token,main");
    assert_eq!(main.range, "0-7");
    assert_eq!(main.sequence_points, vec!["0[0]3:5-3:20", "2[0]4:5-4:20"]);

    let noop = &artifacts.debug.methods[1];
    assert_eq!(noop.name, "demo.util.Math,noop");
    assert_eq!(noop.range, "8-8");
    assert_eq!(noop.sequence_points, vec!["8[1]9:5-9:20"]);
}

#[test]
fn missing_source_degrades_to_name_only_records() {
    let artifacts = compile_classes("demo.Token", vec![token_contract()]).unwrap();

    for m in &artifacts.debug.methods {
        assert!(m.range.is_empty());
        assert!(m.sequence_points.is_empty());
    }
    assert!(artifacts.debug.documents.is_empty());
    // Names, slots and events are still recorded.
    assert_eq!(artifacts.debug.methods[1].params, vec!["owner,hash"]);
    assert_eq!(artifacts.debug.methods[1].return_type, "int");
    assert_eq!(artifacts.debug.events[0].name, "demo.Token,Transfer");
    assert_eq!(artifacts.debug.events[0].params, vec!["to,hash", "amount,int"]);
}

#[test]
fn any_failing_method_yields_no_artifacts() {
    let target = MethodRef { class: "demo.T".into(), method: "bad".into(), sig: void_sig() };
    let main = entry(vec![IrOp::Call { target }, IrOp::Ret]);
    let bad = method("bad", void_sig(), vec![IrOp::Other { name: "mystery".into() }]);
    assert!(compile_classes("demo.T", vec![class("demo.T", vec![main, bad])]).is_err());
}
