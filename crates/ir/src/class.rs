//! Classes, methods, fields and events.

use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;
use crate::insn::IrInsn;
use crate::types::{MethodSig, TypeSig};

/// A reference to a method by owning class, name and signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    pub class: String,
    pub method: String,
    pub sig: MethodSig,
}

impl MethodRef {
    /// Globally unique identifier, `demo.Token.transfer(hash,hash,int)bool`.
    pub fn id(&self) -> String {
        format!("{}.{}{}", self.class, self.method, self.sig)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrClass {
    /// Fully qualified dotted name, `demo.Token`.
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub fields: Vec<IrField>,
    #[serde(default)]
    pub events: Vec<IrEvent>,
    pub methods: Vec<IrMethod>,
}

impl IrClass {
    /// Last segment of the dotted name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn display_name(&self) -> &str {
        self.annotations
            .iter()
            .find_map(|a| match a {
                Annotation::DisplayName { name } => Some(name.as_str()),
                _ => None,
            })
            .unwrap_or_else(|| self.simple_name())
    }

    pub fn source_url(&self) -> Option<&str> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::SourceUrl { url } => Some(url.as_str()),
            _ => None,
        })
    }

    pub fn is_record(&self) -> bool {
        self.annotations.iter().any(Annotation::is_record)
    }

    /// Hash of the deployed contract this interface class stands in for.
    pub fn contract_hash(&self) -> Option<&str> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::ContractHash { hash } => Some(hash.as_str()),
            _ => None,
        })
    }

    pub fn method(&self, name: &str, sig: &MethodSig) -> Option<&IrMethod> {
        self.methods.iter().find(|m| m.name == name && &m.sig == sig)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrField {
    pub name: String,
    pub ty: TypeSig,
}

/// An event the contract can emit, declared at class level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrEvent {
    pub name: String,
    #[serde(default)]
    pub params: Vec<IrParam>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrParam {
    pub name: String,
    pub ty: TypeSig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrLocal {
    pub name: String,
    pub ty: TypeSig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrMethod {
    pub name: String,
    pub sig: MethodSig,
    /// Parameter names, parallel to `sig.params`.
    #[serde(default)]
    pub params: Vec<IrParam>,
    #[serde(default)]
    pub locals: Vec<IrLocal>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub insns: Vec<IrInsn>,
}

impl IrMethod {
    pub fn is_entry_point(&self) -> bool {
        self.annotations.iter().any(Annotation::is_entry_point)
    }

    pub fn is_safe(&self) -> bool {
        self.annotations.iter().any(Annotation::is_safe)
    }

    /// The interop service this method is bound to, if any.
    pub fn syscall(&self) -> Option<&str> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::Syscall { service } => Some(service.as_str()),
            _ => None,
        })
    }

    /// Fixed instruction annotations, in declaration order.
    pub fn fixed_instructions(&self) -> Vec<(u8, Vec<u8>, Vec<u8>)> {
        self.annotations
            .iter()
            .filter_map(|a| match a {
                Annotation::Instruction { opcode, prefix, operand } => {
                    Some((*opcode, prefix.clone(), operand.clone()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn id(&self, class: &str) -> String {
        format!("{}.{}{}", class, self.name, self.sig)
    }

    pub fn reference(&self, class: &str) -> MethodRef {
        MethodRef { class: class.to_string(), method: self.name.clone(), sig: self.sig.clone() }
    }
}
