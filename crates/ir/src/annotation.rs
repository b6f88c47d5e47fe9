//! Annotations attached to classes and methods by the front-end.
//!
//! Annotations are the side-channel for everything that is not executable
//! code: which method is the entry point, how a class maps onto the
//! manifest, and how a method binds to a syscall, an external contract, or
//! a fixed instruction sequence.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// Marks the single method compilation starts from.
    EntryPoint,
    /// Marks an ABI method as read-only.
    Safe,
    /// Marks a class whose instances are flat ordered tuples.
    Record,
    /// Overrides the contract name in the manifest.
    DisplayName { name: String },
    /// Source URL carried into the container header.
    SourceUrl { url: String },
    /// One key/value pair of the manifest's `extra` map.
    ManifestExtra { key: String, value: String },
    /// Grants this contract permission to call into another one. A missing
    /// method list means the wildcard.
    Permission {
        contract: String,
        #[serde(default)]
        methods: Option<Vec<String>>,
    },
    /// Declares another contract or group as trusted.
    Trust { contract: String },
    /// A standard the contract claims to implement.
    SupportedStandard { standard: String },
    /// Group membership: public key plus base64 signature.
    Group { pub_key: String, signature: String },
    /// Binds a method body to a native interop service.
    Syscall { service: String },
    /// Marks an interface class standing in for a deployed contract.
    ContractHash { hash: String },
    /// Replaces a method body with one fixed instruction. Repeated
    /// annotations emit in declaration order.
    Instruction {
        opcode: u8,
        #[serde(default)]
        prefix: Vec<u8>,
        #[serde(default)]
        operand: Vec<u8>,
    },
}

impl Annotation {
    pub fn is_entry_point(&self) -> bool {
        matches!(self, Annotation::EntryPoint)
    }

    pub fn is_safe(&self) -> bool {
        matches!(self, Annotation::Safe)
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Annotation::Record)
    }
}
