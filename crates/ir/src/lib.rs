//! The stack-based intermediate representation the back-end consumes.
//!
//! A front-end lowers contract source into classes of methods whose bodies
//! are flat instruction lists operating on an evaluation stack, with
//! annotations carrying everything that is not code: entry-point marking,
//! manifest metadata, syscall and external-contract bindings, record
//! classes. The whole model round-trips through JSON.

pub mod annotation;
pub mod class;
pub mod insn;
pub mod resolver;
pub mod types;

pub use annotation::Annotation;
pub use class::{IrClass, IrEvent, IrField, IrLocal, IrMethod, IrParam, MethodRef};
pub use insn::{IrInsn, IrOp, Span};
pub use resolver::{ClassResolver, DirResolver, MemoryResolver, ResolveError};
pub use types::{MethodSig, TypeSig};
