//! LyraVM bytecode generator.
//!
//! Compiles the stack-based class IR into a deployable artifact set: the
//! LEF container with the script and method-token table, the contract
//! manifest, and debug symbols. The pipeline walks the call graph from the
//! entry point, translates each reachable method, resolves branch and call
//! placeholders in one finalization pass, and packages everything
//! atomically: any error leaves no output behind.

mod compiler;
mod debug;
mod error;
mod fixup;
mod index;
mod manifest;
mod method;
mod module;
mod translator;
mod walker;


pub use compiler::{compile, Artifacts, CompileOptions, COMPILER_NAME};
pub use debug::sourcelookup::SourceLocator;
pub use debug::{DebugEvent, DebugInfo, DebugMethod};
pub use error::{CodegenError, Result};
pub use fixup::{Fixup, FixupKind};
pub use index::{DocIx, MethodIx, TokenIx};
pub use method::{CompiledMethod, Instruction, LabelId};
pub use module::Module;
pub use walker::{syscall_fixed_price, MethodKind, Walk};
