//! The LyraVM instruction set.
//!
//! Opcodes below 0x4C are data pushes whose opcode byte doubles as the
//! length of the inline data. `PushBytes(n)` models that range; its code
//! *is* `n`. All other opcodes have a fixed byte value.

/// Operand layout of an opcode.
///
/// `prefix` is the number of length-prefix bytes read at runtime to size a
/// variable operand (`PUSHDATA1/2/4`), `len` the number of fixed operand
/// bytes. Exactly one of the two is non-zero for opcodes that take an
/// operand at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandSize {
    pub prefix: usize,
    pub len: usize,
}

impl OperandSize {
    const NONE: OperandSize = OperandSize { prefix: 0, len: 0 };

    const fn fixed(len: usize) -> OperandSize {
        OperandSize { prefix: 0, len }
    }

    const fn prefixed(prefix: usize) -> OperandSize {
        OperandSize { prefix, len: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Pushes an empty byte string.
    Push0,
    /// Pushes `n` inline bytes, 1..=75. The opcode byte equals `n`.
    PushBytes(u8),
    PushData1,
    PushData2,
    PushData4,
    PushM1,
    /// Pushes the small integer `n`, 1..=16, as a single byte.
    PushN(u8),
    Nop,
    PushInt8,
    PushInt16,
    PushInt32,
    PushInt64,
    PushInt128,
    PushInt256,

    Jmp,
    JmpIf,
    JmpIfNot,
    JmpEq,
    JmpNe,
    JmpGt,
    JmpGe,
    JmpLt,
    JmpLe,
    Call,
    CallT,
    Syscall,
    Ret,
    Abort,

    InitSlot,
    LdLoc0,
    LdLoc1,
    LdLoc2,
    LdLoc3,
    LdLoc4,
    LdLoc5,
    LdLoc6,
    LdLoc,
    StLoc0,
    StLoc1,
    StLoc2,
    StLoc3,
    StLoc4,
    StLoc5,
    StLoc6,
    StLoc,
    LdArg0,
    LdArg1,
    LdArg2,
    LdArg3,
    LdArg4,
    LdArg5,
    LdArg6,
    LdArg,
    StArg0,
    StArg1,
    StArg2,
    StArg3,
    StArg4,
    StArg5,
    StArg6,
    StArg,

    Drop,
    Dup,
    Swap,
    Reverse3,
    Reverse4,
    ReverseN,

    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Neg,
    Inc,
    Dec,
    Shl,
    Shr,
    And,
    Or,
    Xor,
    Not,

    Equal,
    NotEqual,
    Lt,
    Le,
    Gt,
    Ge,

    NewArray,
    Pack,
    PackStruct,
    Unpack,
    PickItem,
    SetItem,
    Size,
    Cat,
}

impl Opcode {
    /// The encoded opcode byte.
    pub fn code(self) -> u8 {
        use Opcode::*;
        match self {
            Push0 => 0x00,
            PushBytes(n) => {
                debug_assert!((1..=75).contains(&n));
                n
            }
            PushData1 => 0x4C,
            PushData2 => 0x4D,
            PushData4 => 0x4E,
            PushM1 => 0x4F,
            PushN(n) => {
                debug_assert!((1..=16).contains(&n));
                0x50 + n
            }
            Nop => 0x61,
            PushInt8 => 0x62,
            PushInt16 => 0x63,
            PushInt32 => 0x64,
            PushInt64 => 0x65,
            PushInt128 => 0x66,
            PushInt256 => 0x67,

            Jmp => 0x70,
            JmpIf => 0x71,
            JmpIfNot => 0x72,
            JmpEq => 0x73,
            JmpNe => 0x74,
            JmpGt => 0x75,
            JmpGe => 0x76,
            JmpLt => 0x77,
            JmpLe => 0x78,
            Call => 0x7A,
            CallT => 0x7B,
            Syscall => 0x7C,
            Ret => 0x7D,
            Abort => 0x7E,

            InitSlot => 0x80,
            LdLoc0 => 0x82,
            LdLoc1 => 0x83,
            LdLoc2 => 0x84,
            LdLoc3 => 0x85,
            LdLoc4 => 0x86,
            LdLoc5 => 0x87,
            LdLoc6 => 0x88,
            LdLoc => 0x89,
            StLoc0 => 0x8A,
            StLoc1 => 0x8B,
            StLoc2 => 0x8C,
            StLoc3 => 0x8D,
            StLoc4 => 0x8E,
            StLoc5 => 0x8F,
            StLoc6 => 0x90,
            StLoc => 0x91,
            LdArg0 => 0x92,
            LdArg1 => 0x93,
            LdArg2 => 0x94,
            LdArg3 => 0x95,
            LdArg4 => 0x96,
            LdArg5 => 0x97,
            LdArg6 => 0x98,
            LdArg => 0x99,
            StArg0 => 0x9A,
            StArg1 => 0x9B,
            StArg2 => 0x9C,
            StArg3 => 0x9D,
            StArg4 => 0x9E,
            StArg5 => 0x9F,
            StArg6 => 0xA0,
            StArg => 0xA1,

            Drop => 0xA2,
            Dup => 0xA3,
            Swap => 0xA4,
            Reverse3 => 0xA5,
            Reverse4 => 0xA6,
            ReverseN => 0xA7,

            Add => 0xB0,
            Sub => 0xB1,
            Mul => 0xB2,
            Div => 0xB3,
            Mod => 0xB4,
            Neg => 0xB5,
            Inc => 0xB6,
            Dec => 0xB7,
            Shl => 0xB8,
            Shr => 0xB9,
            And => 0xBA,
            Or => 0xBB,
            Xor => 0xBC,
            Not => 0xBD,

            Equal => 0xC0,
            NotEqual => 0xC1,
            Lt => 0xC2,
            Le => 0xC3,
            Gt => 0xC4,
            Ge => 0xC5,

            NewArray => 0xD0,
            Pack => 0xD1,
            PackStruct => 0xD2,
            Unpack => 0xD3,
            PickItem => 0xD4,
            SetItem => 0xD5,
            Size => 0xD6,
            Cat => 0xD7,
        }
    }

    /// Decodes an opcode byte. Returns `None` for unassigned bytes.
    pub fn from_code(code: u8) -> Option<Opcode> {
        use Opcode::*;
        Some(match code {
            0x00 => Push0,
            0x01..=0x4B => PushBytes(code),
            0x4C => PushData1,
            0x4D => PushData2,
            0x4E => PushData4,
            0x4F => PushM1,
            0x51..=0x60 => PushN(code - 0x50),
            0x61 => Nop,
            0x62 => PushInt8,
            0x63 => PushInt16,
            0x64 => PushInt32,
            0x65 => PushInt64,
            0x66 => PushInt128,
            0x67 => PushInt256,

            0x70 => Jmp,
            0x71 => JmpIf,
            0x72 => JmpIfNot,
            0x73 => JmpEq,
            0x74 => JmpNe,
            0x75 => JmpGt,
            0x76 => JmpGe,
            0x77 => JmpLt,
            0x78 => JmpLe,
            0x7A => Call,
            0x7B => CallT,
            0x7C => Syscall,
            0x7D => Ret,
            0x7E => Abort,

            0x80 => InitSlot,
            0x82 => LdLoc0,
            0x83 => LdLoc1,
            0x84 => LdLoc2,
            0x85 => LdLoc3,
            0x86 => LdLoc4,
            0x87 => LdLoc5,
            0x88 => LdLoc6,
            0x89 => LdLoc,
            0x8A => StLoc0,
            0x8B => StLoc1,
            0x8C => StLoc2,
            0x8D => StLoc3,
            0x8E => StLoc4,
            0x8F => StLoc5,
            0x90 => StLoc6,
            0x91 => StLoc,
            0x92 => LdArg0,
            0x93 => LdArg1,
            0x94 => LdArg2,
            0x95 => LdArg3,
            0x96 => LdArg4,
            0x97 => LdArg5,
            0x98 => LdArg6,
            0x99 => LdArg,
            0x9A => StArg0,
            0x9B => StArg1,
            0x9C => StArg2,
            0x9D => StArg3,
            0x9E => StArg4,
            0x9F => StArg5,
            0xA0 => StArg6,
            0xA1 => StArg,

            0xA2 => Drop,
            0xA3 => Dup,
            0xA4 => Swap,
            0xA5 => Reverse3,
            0xA6 => Reverse4,
            0xA7 => ReverseN,

            0xB0 => Add,
            0xB1 => Sub,
            0xB2 => Mul,
            0xB3 => Div,
            0xB4 => Mod,
            0xB5 => Neg,
            0xB6 => Inc,
            0xB7 => Dec,
            0xB8 => Shl,
            0xB9 => Shr,
            0xBA => And,
            0xBB => Or,
            0xBC => Xor,
            0xBD => Not,

            0xC0 => Equal,
            0xC1 => NotEqual,
            0xC2 => Lt,
            0xC3 => Le,
            0xC4 => Gt,
            0xC5 => Ge,

            0xD0 => NewArray,
            0xD1 => Pack,
            0xD2 => PackStruct,
            0xD3 => Unpack,
            0xD4 => PickItem,
            0xD5 => SetItem,
            0xD6 => Size,
            0xD7 => Cat,

            _ => return None,
        })
    }

    /// Operand layout for this opcode.
    pub fn operand_size(self) -> OperandSize {
        use Opcode::*;
        match self {
            PushBytes(n) => OperandSize::fixed(n as usize),
            PushData1 => OperandSize::prefixed(1),
            PushData2 => OperandSize::prefixed(2),
            PushData4 => OperandSize::prefixed(4),
            PushInt8 => OperandSize::fixed(1),
            PushInt16 => OperandSize::fixed(2),
            PushInt32 => OperandSize::fixed(4),
            PushInt64 => OperandSize::fixed(8),
            PushInt128 => OperandSize::fixed(16),
            PushInt256 => OperandSize::fixed(32),
            Jmp | JmpIf | JmpIfNot | JmpEq | JmpNe | JmpGt | JmpGe | JmpLt | JmpLe | Call => {
                OperandSize::fixed(4)
            }
            CallT => OperandSize::fixed(2),
            Syscall => OperandSize::fixed(4),
            InitSlot => OperandSize::fixed(2),
            LdLoc | StLoc | LdArg | StArg => OperandSize::fixed(1),
            _ => OperandSize::NONE,
        }
    }

    /// Small-integer push for `-1..=16`, or `None` outside that range.
    pub fn push_small(value: i32) -> Option<Opcode> {
        match value {
            -1 => Some(Opcode::PushM1),
            0 => Some(Opcode::Push0),
            1..=16 => Some(Opcode::PushN(value as u8)),
            _ => None,
        }
    }

    /// Dedicated one-byte slot opcode for indices 0..=6.
    pub fn load_local(slot: u8) -> Option<Opcode> {
        use Opcode::*;
        [LdLoc0, LdLoc1, LdLoc2, LdLoc3, LdLoc4, LdLoc5, LdLoc6]
            .get(slot as usize)
            .copied()
    }

    pub fn store_local(slot: u8) -> Option<Opcode> {
        use Opcode::*;
        [StLoc0, StLoc1, StLoc2, StLoc3, StLoc4, StLoc5, StLoc6]
            .get(slot as usize)
            .copied()
    }

    pub fn load_arg(slot: u8) -> Option<Opcode> {
        use Opcode::*;
        [LdArg0, LdArg1, LdArg2, LdArg3, LdArg4, LdArg5, LdArg6]
            .get(slot as usize)
            .copied()
    }

    pub fn store_arg(slot: u8) -> Option<Opcode> {
        use Opcode::*;
        [StArg0, StArg1, StArg2, StArg3, StArg4, StArg5, StArg6]
            .get(slot as usize)
            .copied()
    }
}
