//! Compiled methods and their instructions.

use smallvec::SmallVec;

use lyra_contract::Opcode;
use lyra_ir::{MethodSig, Span, TypeSig};

/// A branch target inside one method. Labels are placed at "the next
/// instruction emitted" and resolved exactly once during finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelId(u32);

/// One emitted LyraVM instruction: opcode byte plus operand bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: SmallVec<[u8; 8]>,
    /// Byte address relative to the start of the owning method.
    pub address: u32,
    /// Source span, set on instructions that begin a source statement.
    pub span: Option<Span>,
}

impl Instruction {
    pub fn byte_size(&self) -> u32 {
        1 + self.operand.len() as u32
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(self.opcode.code());
        out.extend_from_slice(&self.operand);
    }
}

/// A method translated to LyraVM instructions, with addresses assigned
/// relative to its own start. The absolute start address is filled in when
/// the module is finalized.
#[derive(Debug)]
pub struct CompiledMethod {
    /// Unique identifier, `demo.Token.transfer(hash,hash,int)bool`.
    pub id: String,
    pub class: String,
    pub name: String,
    pub sig: MethodSig,
    /// Parameter names and types, in declaration order.
    pub params: Vec<(String, TypeSig)>,
    pub locals: Vec<(String, TypeSig)>,
    /// Whether the method appears in the manifest ABI.
    pub is_abi: bool,
    pub is_safe: bool,
    pub insns: Vec<Instruction>,
    pub start_address: Option<u32>,
    labels: Vec<Option<u32>>,
    next_address: u32,
}

impl CompiledMethod {
    pub fn new(
        id: String,
        class: String,
        name: String,
        sig: MethodSig,
        params: Vec<(String, TypeSig)>,
        locals: Vec<(String, TypeSig)>,
    ) -> CompiledMethod {
        CompiledMethod {
            id,
            class,
            name,
            sig,
            params,
            locals,
            is_abi: false,
            is_safe: false,
            insns: Vec::new(),
            start_address: None,
            labels: Vec::new(),
            next_address: 0,
        }
    }

    /// Appends an instruction, assigning it the next free address.
    /// Returns its index for later operand patching.
    pub fn emit(&mut self, opcode: Opcode, operand: &[u8]) -> usize {
        let insn = Instruction {
            opcode,
            operand: SmallVec::from_slice(operand),
            address: self.next_address,
            span: None,
        };
        self.next_address += insn.byte_size();
        self.insns.push(insn);
        self.insns.len() - 1
    }

    pub fn emit_op(&mut self, opcode: Opcode) -> usize {
        self.emit(opcode, &[])
    }

    pub fn set_span(&mut self, insn: usize, span: Span) {
        self.insns[insn].span = Some(span);
    }

    pub fn new_label(&mut self) -> LabelId {
        self.labels.push(None);
        LabelId(self.labels.len() as u32 - 1)
    }

    /// Binds a label to the address of the next instruction emitted.
    pub fn place_label(&mut self, label: LabelId) {
        let slot = &mut self.labels[label.0 as usize];
        debug_assert!(slot.is_none(), "label placed twice");
        *slot = Some(self.next_address);
    }

    pub fn label_address(&self, label: LabelId) -> Option<u32> {
        self.labels[label.0 as usize]
    }

    /// Total encoded size in bytes.
    pub fn byte_size(&self) -> u32 {
        self.next_address
    }

    /// Relative address of the last instruction, 0 for an empty body.
    pub fn last_address(&self) -> u32 {
        self.insns.last().map_or(0, |i| i.address)
    }

    /// `declaring.Class,methodName`, the debug-info method name form.
    pub fn debug_name(&self) -> String {
        format!("{},{}", self.class, self.name)
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        for insn in &self.insns {
            insn.encode_into(out);
        }
    }

    /// Addresses must be contiguous and strictly increasing.
    pub fn check_contiguous(&self) -> bool {
        let mut expected = 0u32;
        for insn in &self.insns {
            if insn.address != expected {
                return false;
            }
            expected += insn.byte_size();
        }
        expected == self.next_address
    }
}
