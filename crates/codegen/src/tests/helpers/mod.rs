//! Shared builders and script decoding for tests.

use lyra_contract::Opcode;
use lyra_ir::{
    Annotation, IrClass, IrInsn, IrMethod, IrOp, MemoryResolver, MethodSig, TypeSig,
};

use crate::compiler::{compile, Artifacts, CompileOptions};
use crate::error::Result;

pub fn void_sig() -> MethodSig {
    MethodSig::new(vec![], TypeSig::Void)
}

pub fn class(name: &str, methods: Vec<IrMethod>) -> IrClass {
    IrClass {
        name: name.to_string(),
        annotations: vec![],
        fields: vec![],
        events: vec![],
        methods,
    }
}

pub fn method(name: &str, sig: MethodSig, insns: Vec<IrOp>) -> IrMethod {
    IrMethod {
        name: name.to_string(),
        sig,
        params: vec![],
        locals: vec![],
        is_public: false,
        annotations: vec![],
        insns: insns.into_iter().map(IrInsn::new).collect(),
    }
}

/// A public entry-point method named `main`.
pub fn entry(insns: Vec<IrOp>) -> IrMethod {
    let mut m = method("main", void_sig(), insns);
    m.is_public = true;
    m.annotations.push(Annotation::EntryPoint);
    m
}

pub fn compile_classes(contract: &str, classes: Vec<IrClass>) -> Result<Artifacts> {
    let resolver = MemoryResolver::new(classes);
    compile(&resolver, contract, &CompileOptions::default())
}

pub fn compile_single(class: IrClass) -> Result<Artifacts> {
    let name = class.name.clone();
    compile_classes(&name, vec![class])
}

/// Splits a script into `(opcode_byte, operand_bytes)` pairs.
pub fn decode(script: &[u8]) -> Vec<(u8, Vec<u8>)> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < script.len() {
        let code = script[pos];
        pos += 1;
        let opcode = Opcode::from_code(code)
            .unwrap_or_else(|| panic!("undecodable opcode {code:#04x} at {}", pos - 1));
        let size = opcode.operand_size();
        let operand_len = if size.prefix > 0 {
            let mut prefix = [0u8; 8];
            prefix[..size.prefix].copy_from_slice(&script[pos..pos + size.prefix]);
            size.prefix + u64::from_le_bytes(prefix) as usize
        } else {
            size.len
        };
        out.push((code, script[pos..pos + operand_len].to_vec()));
        pos += operand_len;
    }
    out
}

/// Opcode bytes only, for shape assertions.
pub fn opcodes(script: &[u8]) -> Vec<u8> {
    decode(script).into_iter().map(|(code, _)| code).collect()
}
