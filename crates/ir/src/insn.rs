//! IR instructions.

use serde::{Deserialize, Serialize};

use crate::class::MethodRef;

/// Source span of one instruction, 1-based lines and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

/// One instruction of a method body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrInsn {
    #[serde(flatten)]
    pub op: IrOp,
    /// Present on instructions that begin a new source statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl IrInsn {
    pub fn new(op: IrOp) -> IrInsn {
        IrInsn { op, span: None }
    }

    pub fn with_span(op: IrOp, span: Span) -> IrInsn {
        IrInsn { op, span: Some(span) }
    }
}

/// The operation set of the IR. Jump targets are indices into the owning
/// method's instruction list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum IrOp {
    // Constants.
    PushInt { value: i128 },
    PushData { bytes: Vec<u8> },
    PushString { value: String },
    PushBool { value: bool },
    PushNull,

    // Slots. Indices above 255 are representable here but rejected by the
    // back-end as a structural error.
    LoadLocal { slot: u16 },
    StoreLocal { slot: u16 },
    LoadArg { slot: u16 },
    StoreArg { slot: u16 },

    // Stack shuffling.
    Dup,
    Drop,
    Swap,

    // Arithmetic and bitwise.
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Neg,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,

    // Comparison.
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Control flow.
    Jump { target: u32 },
    JumpIf { target: u32 },
    JumpIfNot { target: u32 },
    JumpEq { target: u32 },
    JumpNe { target: u32 },
    JumpGt { target: u32 },
    JumpGe { target: u32 },
    JumpLt { target: u32 },
    JumpLe { target: u32 },
    Ret,
    RetValue,
    Abort,

    // Calls and events.
    Call { target: MethodRef },
    Emit { event: String, args: u8 },

    // Records and arrays.
    New { class: String },
    GetField { index: u16 },
    SetField { index: u16 },
    NewArray,
    ArrayGet,
    ArraySet,
    ArrayLen,
    Concat,

    /// A construct the front-end could not lower. Always a translation
    /// error when reached, reported under the given name.
    Other { name: String },
}

impl IrOp {
    /// Branch target, if this is any jump variant.
    pub fn jump_target(&self) -> Option<u32> {
        use IrOp::*;
        match self {
            Jump { target }
            | JumpIf { target }
            | JumpIfNot { target }
            | JumpEq { target }
            | JumpNe { target }
            | JumpGt { target }
            | JumpGe { target }
            | JumpLt { target }
            | JumpLe { target } => Some(*target),
            _ => None,
        }
    }
}
