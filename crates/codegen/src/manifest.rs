//! Manifest assembly from class annotations and the compiled module.

use std::collections::BTreeMap;

use lyra_contract::manifest::{
    Abi, AbiEvent, AbiMethod, AbiParameter, Group, Manifest, ParamType, Permission,
    WildcardList,
};
use lyra_ir::{Annotation, TypeSig};

use crate::module::Module;
use crate::walker::Walk;

pub(crate) fn build(module: &Module, walk: &Walk) -> Manifest {
    let contract = &walk.contract;

    let mut groups = Vec::new();
    let mut supported_standards = Vec::new();
    let mut permissions = Vec::new();
    let mut trusts = Vec::new();
    let mut trust_all = false;
    let mut extra = BTreeMap::new();

    for annotation in &contract.annotations {
        match annotation {
            Annotation::Group { pub_key, signature } => {
                groups.push(Group { pub_key: pub_key.clone(), signature: signature.clone() });
            }
            Annotation::SupportedStandard { standard } => {
                supported_standards.push(standard.clone());
            }
            Annotation::Permission { contract, methods } => {
                permissions.push(Permission {
                    contract: contract.clone(),
                    methods: match methods {
                        Some(list) => WildcardList::List(list.clone()),
                        None => WildcardList::wildcard(),
                    },
                });
            }
            Annotation::Trust { contract } => {
                if contract == "*" {
                    trust_all = true;
                } else {
                    trusts.push(contract.clone());
                }
            }
            Annotation::ManifestExtra { key, value } => {
                extra.insert(key.clone(), value.clone());
            }
            _ => {}
        }
    }

    let methods = module
        .methods
        .iter()
        .filter(|m| m.is_abi)
        .map(|m| AbiMethod {
            name: m.name.clone(),
            parameters: m
                .params
                .iter()
                .map(|(name, ty)| AbiParameter { name: name.clone(), ty: param_type(ty) })
                .collect(),
            offset: m.start_address.unwrap_or(0),
            return_type: param_type(&m.sig.ret),
            safe: m.is_safe,
        })
        .collect();

    let events = contract
        .events
        .iter()
        .map(|event| AbiEvent {
            name: event.name.clone(),
            parameters: event
                .params
                .iter()
                .map(|p| AbiParameter { name: p.name.clone(), ty: param_type(&p.ty) })
                .collect(),
        })
        .collect();

    Manifest {
        name: contract.display_name().to_string(),
        groups,
        supported_standards,
        abi: Abi { methods, events },
        permissions,
        trusts: if trust_all {
            WildcardList::wildcard()
        } else {
            WildcardList::List(trusts)
        },
        extra,
    }
}

/// ABI type of an IR type. Records surface as arrays, their wire shape.
fn param_type(ty: &TypeSig) -> ParamType {
    match ty {
        TypeSig::Void => ParamType::Void,
        TypeSig::Bool => ParamType::Boolean,
        TypeSig::Int => ParamType::Integer,
        TypeSig::Bytes => ParamType::ByteArray,
        TypeSig::Str => ParamType::String,
        TypeSig::Hash => ParamType::Hash,
        TypeSig::PubKey => ParamType::PublicKey,
        TypeSig::Array => ParamType::Array,
        TypeSig::Map => ParamType::Map,
        TypeSig::Any => ParamType::Any,
        TypeSig::Object(_) => ParamType::Array,
    }
}
