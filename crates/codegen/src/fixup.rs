//! Pending operand fixups.
//!
//! Translation emits branches and calls with a four-byte zero placeholder
//! and records a tagged fixup here. All placeholders are rewritten in one
//! pass once every method has its start address.

use crate::index::MethodIx;
use crate::method::LabelId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixupKind {
    /// Relative branch to a label in the same method. Patched with
    /// `target - branch_address` as i32 little-endian.
    Branch { label: LabelId },
    /// Call to a compiled method. Patched with the callee's absolute start
    /// address as u32 little-endian.
    Call { callee: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixup {
    pub method: MethodIx,
    /// Index of the instruction whose operand is pending.
    pub insn: usize,
    pub kind: FixupKind,
}
