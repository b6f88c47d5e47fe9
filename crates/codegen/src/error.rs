//! Error types for code generation.

use std::fmt;

use lyra_contract::lef::LefError;
use lyra_ir::ResolveError;

#[derive(Debug)]
pub enum CodegenError {
    /// No method is marked as the entry point.
    NoEntryPoint { class: String },
    /// More than one method is marked as the entry point.
    MultipleEntryPoints { class: String, first: String, second: String },
    /// A method declares more than 255 parameters.
    TooManyParameters { method: String, count: usize },
    /// A method declares more than 255 local variables.
    TooManyLocals { method: String, count: usize },
    /// A slot access is outside the one-byte index range.
    SlotOutOfRange { method: String, slot: u16 },
    /// The safe marker on a method that never reaches the manifest ABI.
    SafeOnPrivateMethod { method: String },
    /// A jump targets an instruction index outside the method body.
    JumpOutOfRange { method: String, target: u32 },
    /// An IR instruction has no LyraVM mapping.
    UnsupportedInstruction { method: String, name: String },
    /// Record construction on a class without the record marker.
    NotARecord { method: String, class: String },
    /// A syscall binding names a service missing from the interop table.
    UnknownSyscall { method: String, service: String },
    /// A fixed price was requested for an input-priced service.
    VariablePriceSyscall { service: String },
    /// A fixed-instruction annotation does not match the opcode table.
    BadInstructionAnnotation { method: String, reason: String },
    /// A data push larger than the script format allows.
    DataTooLong { method: String, len: usize },
    /// The method-token table outgrew its two-byte index space.
    TooManyTokens { count: usize },
    /// Internal: a branch points at a label that was never placed.
    UnresolvedLabel { method: String },
    /// Internal: a call placeholder names a method the module never compiled.
    UnresolvedCall { callee: String },
    /// Internal: a branch distance outside the i32 range.
    BranchOutOfRange { method: String },
    /// A class could not be loaded.
    Resolve(ResolveError),
    /// Container assembly failed.
    Package(LefError),
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodegenError::NoEntryPoint { class } => {
                write!(f, "class '{class}' has no entry-point method")
            }
            CodegenError::MultipleEntryPoints { class, first, second } => {
                write!(f, "class '{class}' marks both '{first}' and '{second}' as entry points")
            }
            CodegenError::TooManyParameters { method, count } => {
                write!(f, "method '{method}' has {count} parameters, the limit is 255")
            }
            CodegenError::TooManyLocals { method, count } => {
                write!(f, "method '{method}' has {count} local variables, the limit is 255")
            }
            CodegenError::SlotOutOfRange { method, slot } => {
                write!(f, "method '{method}' accesses slot {slot}, the limit is 255")
            }
            CodegenError::SafeOnPrivateMethod { method } => {
                write!(f, "method '{method}' is not a public contract method, marking it safe has no effect")
            }
            CodegenError::JumpOutOfRange { method, target } => {
                write!(f, "method '{method}' jumps to instruction {target}, past the end of the body")
            }
            CodegenError::UnsupportedInstruction { method, name } => {
                write!(f, "method '{method}' uses unsupported instruction '{name}'")
            }
            CodegenError::NotARecord { method, class } => {
                write!(f, "method '{method}' constructs '{class}', which is not a record class")
            }
            CodegenError::UnknownSyscall { method, service } => {
                write!(f, "method '{method}' is bound to unknown service '{service}'")
            }
            CodegenError::VariablePriceSyscall { service } => {
                write!(f, "service '{service}' has no fixed price")
            }
            CodegenError::BadInstructionAnnotation { method, reason } => {
                write!(f, "bad instruction annotation on '{method}': {reason}")
            }
            CodegenError::DataTooLong { method, len } => {
                write!(f, "method '{method}' pushes {len} bytes, the limit is 65535")
            }
            CodegenError::TooManyTokens { count } => {
                write!(f, "{count} method tokens exceed the 65536-entry table")
            }
            CodegenError::UnresolvedLabel { method } => {
                write!(f, "internal: unresolved branch label in '{method}'")
            }
            CodegenError::UnresolvedCall { callee } => {
                write!(f, "internal: call to uncompiled method '{callee}'")
            }
            CodegenError::BranchOutOfRange { method } => {
                write!(f, "internal: branch distance overflow in '{method}'")
            }
            CodegenError::Resolve(e) => write!(f, "{e}"),
            CodegenError::Package(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CodegenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodegenError::Resolve(e) => Some(e),
            CodegenError::Package(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResolveError> for CodegenError {
    fn from(e: ResolveError) -> CodegenError {
        CodegenError::Resolve(e)
    }
}

impl From<LefError> for CodegenError {
    fn from(e: LefError) -> CodegenError {
        CodegenError::Package(e)
    }
}

pub type Result<T> = std::result::Result<T, CodegenError>;
