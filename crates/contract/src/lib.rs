//! Target-side formats for the LyraVM.
//!
//! Everything the back-end needs to know about the execution side lives
//! here: the opcode table and operand sizing, the byte-level script writer
//! with its push encodings, the LEF binary container, the contract
//! manifest data model, call flags, and the interop service table.

pub mod callflags;
pub mod hash;
pub mod interop;
pub mod lef;
pub mod manifest;
pub mod opcode;
pub mod script;

pub use callflags::CallFlags;
pub use hash::ContractHash;
pub use interop::InteropService;
pub use lef::{LefFile, MethodToken};
pub use opcode::{Opcode, OperandSize};
pub use script::{ScriptError, ScriptReader, ScriptWriter};
