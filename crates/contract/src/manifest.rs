//! The contract manifest: the JSON document deployed next to the script
//! that declares the ABI, permissions, trusts, groups, supported standards
//! and free-form extra metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub groups: Vec<Group>,
    #[serde(rename = "supportedstandards")]
    pub supported_standards: Vec<String>,
    pub abi: Abi,
    pub permissions: Vec<Permission>,
    pub trusts: WildcardList,
    pub extra: BTreeMap<String, String>,
}

/// A group the contract belongs to: a public key plus a base64 signature
/// of the contract hash by that key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "pubkey")]
    pub pub_key: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Abi {
    pub methods: Vec<AbiMethod>,
    pub events: Vec<AbiEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbiMethod {
    pub name: String,
    pub parameters: Vec<AbiParameter>,
    /// Byte offset of the method's first instruction in the script.
    pub offset: u32,
    #[serde(rename = "returntype")]
    pub return_type: ParamType,
    pub safe: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbiEvent {
    pub name: String,
    pub parameters: Vec<AbiParameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbiParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
}

/// Parameter and return types as they appear in the ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Any,
    Void,
    Boolean,
    Integer,
    #[serde(rename = "bytearray")]
    ByteArray,
    String,
    Hash,
    #[serde(rename = "publickey")]
    PublicKey,
    Array,
    Map,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    /// Contract hash, group public key, or `"*"`.
    pub contract: String,
    pub methods: WildcardList,
}

/// Either the wildcard `"*"` or an explicit list of names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WildcardList {
    Wildcard(Wildcard),
    List(Vec<String>),
}

/// Serializes as the literal string `"*"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wildcard {
    #[serde(rename = "*")]
    Star,
}

impl WildcardList {
    pub fn wildcard() -> WildcardList {
        WildcardList::Wildcard(Wildcard::Star)
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, WildcardList::Wildcard(_))
    }
}
