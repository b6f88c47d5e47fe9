//! Value and method signature types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The type of a value as the front-end saw it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSig {
    Void,
    Bool,
    Int,
    Bytes,
    Str,
    Hash,
    PubKey,
    Array,
    Map,
    Any,
    /// A user-defined class, by fully qualified name.
    Object(String),
}

impl fmt::Display for TypeSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSig::Void => write!(f, "void"),
            TypeSig::Bool => write!(f, "bool"),
            TypeSig::Int => write!(f, "int"),
            TypeSig::Bytes => write!(f, "bytes"),
            TypeSig::Str => write!(f, "str"),
            TypeSig::Hash => write!(f, "hash"),
            TypeSig::PubKey => write!(f, "pubkey"),
            TypeSig::Array => write!(f, "array"),
            TypeSig::Map => write!(f, "map"),
            TypeSig::Any => write!(f, "any"),
            TypeSig::Object(name) => write!(f, "{name}"),
        }
    }
}

/// Parameter and return types of a method. Together with the owning class
/// and the method name this identifies a method uniquely; overloads differ
/// in their rendered descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSig {
    pub params: Vec<TypeSig>,
    pub ret: TypeSig,
}

impl MethodSig {
    pub fn new(params: Vec<TypeSig>, ret: TypeSig) -> MethodSig {
        MethodSig { params, ret }
    }

    /// `(int,hash)bool` style descriptor used in method identifiers.
    pub fn descriptor(&self) -> String {
        self.to_string()
    }

    pub fn has_return(&self) -> bool {
        self.ret != TypeSig::Void
    }
}

impl fmt::Display for MethodSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, "){}", self.ret)
    }
}
