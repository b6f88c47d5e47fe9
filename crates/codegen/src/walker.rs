//! Call-graph discovery and method classification.
//!
//! Starting from the unique entry-point method, every statically reachable
//! callee is discovered and classified exactly once. Call sites later
//! dispatch on the resulting tag without re-inspecting annotations.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tracing::debug;

use lyra_contract::interop::{self, InteropService};
use lyra_contract::{ContractHash, Opcode};
use lyra_ir::{ClassResolver, IrClass, IrOp, MethodRef, ResolveError};

use crate::error::{CodegenError, Result};

/// How a call site reaches its callee, resolved once per method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodKind {
    /// Compiled into the module and reached by `CALL`.
    Ordinary,
    /// Bound to a native interop service, reached by `SYSCALL`.
    Syscall { service: &'static InteropService },
    /// A method of a deployed contract, reached by `CALLT`.
    ContractCall { hash: ContractHash, method: String, params: u16, has_return: bool },
    /// `getHash` on a contract interface: the hash is pushed as data.
    HashLiteral { hash: ContractHash },
    /// The body is replaced by fixed instructions, emitted inline.
    FixedSequence { insns: Vec<(Opcode, Vec<u8>)> },
}

/// Result of walking the call graph from the entry point.
#[derive(Debug)]
pub struct Walk {
    pub contract: Arc<IrClass>,
    /// Every class touched during the walk, by name.
    pub classes: HashMap<String, Arc<IrClass>>,
    /// Ordinary methods in compilation order, entry first.
    pub order: Vec<MethodRef>,
    /// Classification of every referenced method, by method id.
    pub kinds: HashMap<String, MethodKind>,
}

impl Walk {
    pub fn kind(&self, id: &str) -> Option<&MethodKind> {
        self.kinds.get(id)
    }

    pub fn class(&self, name: &str) -> Option<&Arc<IrClass>> {
        self.classes.get(name)
    }
}

/// Fixed invocation price of an interop service.
pub fn syscall_fixed_price(service: &str) -> Result<u64> {
    let svc = interop::lookup(service).ok_or_else(|| CodegenError::UnknownSyscall {
        method: "price query".to_string(),
        service: service.to_string(),
    })?;
    svc.price
        .ok_or_else(|| CodegenError::VariablePriceSyscall { service: service.to_string() })
}

pub fn walk(resolver: &dyn ClassResolver, contract: &str) -> Result<Walk> {
    let contract_class = resolver.resolve(contract)?;

    let entry = find_entry_point(&contract_class)?;
    debug!(entry = %entry.id(), "entry point located");

    let mut walk = Walk {
        contract: contract_class.clone(),
        classes: HashMap::from([(contract_class.name.clone(), contract_class.clone())]),
        order: Vec::new(),
        kinds: HashMap::new(),
    };

    let mut queued: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<MethodRef> = VecDeque::new();
    queued.insert(entry.id());
    walk.kinds.insert(entry.id(), MethodKind::Ordinary);
    queue.push_back(entry);

    while let Some(current) = queue.pop_front() {
        walk.order.push(current.clone());
        let class = load_class(resolver, &mut walk, &current.class)?;
        let method = class
            .method(&current.method, &current.sig)
            .ok_or_else(|| ResolveError::NotFound(current.id()))?;

        for insn in &method.insns {
            match &insn.op {
                IrOp::Call { target } => {
                    let id = target.id();
                    if walk.kinds.contains_key(&id) {
                        continue;
                    }
                    let kind = classify(resolver, &mut walk, target)?;
                    let ordinary = kind == MethodKind::Ordinary;
                    walk.kinds.insert(id.clone(), kind);
                    if ordinary && queued.insert(id) {
                        queue.push_back(target.clone());
                    }
                }
                IrOp::New { class } => {
                    // Record classes are needed at translation time for
                    // their field count.
                    load_class(resolver, &mut walk, class)?;
                }
                _ => {}
            }
        }
    }

    debug!(methods = walk.order.len(), classes = walk.classes.len(), "call graph walked");
    Ok(walk)
}

fn find_entry_point(class: &IrClass) -> Result<MethodRef> {
    let mut entry: Option<MethodRef> = None;
    for method in &class.methods {
        if !method.is_entry_point() {
            continue;
        }
        if let Some(first) = &entry {
            return Err(CodegenError::MultipleEntryPoints {
                class: class.name.clone(),
                first: first.id(),
                second: method.id(&class.name),
            });
        }
        entry = Some(method.reference(&class.name));
    }
    entry.ok_or_else(|| CodegenError::NoEntryPoint { class: class.name.clone() })
}

fn load_class<'a>(
    resolver: &dyn ClassResolver,
    walk: &'a mut Walk,
    name: &str,
) -> Result<Arc<IrClass>> {
    if let Some(class) = walk.classes.get(name) {
        return Ok(class.clone());
    }
    let class = resolver.resolve(name)?;
    walk.classes.insert(name.to_string(), class.clone());
    Ok(class)
}

fn classify(
    resolver: &dyn ClassResolver,
    walk: &mut Walk,
    target: &MethodRef,
) -> Result<MethodKind> {
    let class = load_class(resolver, walk, &target.class)?;

    if let Some(hex) = class.contract_hash() {
        let hash = ContractHash::from_hex(hex).map_err(|e| {
            ResolveError::Parse { class: class.name.clone(), message: e.to_string() }
        })?;
        if target.method == "getHash" {
            return Ok(MethodKind::HashLiteral { hash });
        }
        return Ok(MethodKind::ContractCall {
            hash,
            method: target.method.clone(),
            params: target.sig.params.len() as u16,
            has_return: target.sig.has_return(),
        });
    }

    let method = class
        .method(&target.method, &target.sig)
        .ok_or_else(|| ResolveError::NotFound(target.id()))?;

    if let Some(service) = method.syscall() {
        let service =
            interop::lookup(service).ok_or_else(|| CodegenError::UnknownSyscall {
                method: target.id(),
                service: service.to_string(),
            })?;
        return Ok(MethodKind::Syscall { service });
    }

    let fixed = method.fixed_instructions();
    if !fixed.is_empty() {
        let insns = validate_fixed(&target.id(), &fixed)?;
        return Ok(MethodKind::FixedSequence { insns });
    }

    Ok(MethodKind::Ordinary)
}

/// Checks fixed-instruction annotations against the opcode table and
/// flattens prefix and operand into the final operand bytes.
fn validate_fixed(
    method: &str,
    annotations: &[(u8, Vec<u8>, Vec<u8>)],
) -> Result<Vec<(Opcode, Vec<u8>)>> {
    let mut out = Vec::with_capacity(annotations.len());
    for (code, prefix, operand) in annotations {
        let opcode = Opcode::from_code(*code).ok_or_else(|| {
            CodegenError::BadInstructionAnnotation {
                method: method.to_string(),
                reason: format!("byte {code:#04x} is not an opcode"),
            }
        })?;
        let size = opcode.operand_size();
        if size.prefix > 0 {
            if prefix.len() != size.prefix {
                return Err(CodegenError::BadInstructionAnnotation {
                    method: method.to_string(),
                    reason: format!(
                        "opcode {code:#04x} wants a {}-byte length prefix, got {}",
                        size.prefix,
                        prefix.len()
                    ),
                });
            }
            let mut declared = [0u8; 8];
            declared[..prefix.len()].copy_from_slice(prefix);
            let declared = u64::from_le_bytes(declared);
            if operand.len() as u64 != declared {
                return Err(CodegenError::BadInstructionAnnotation {
                    method: method.to_string(),
                    reason: format!(
                        "prefix declares {declared} operand bytes, got {}",
                        operand.len()
                    ),
                });
            }
        } else {
            if !prefix.is_empty() {
                return Err(CodegenError::BadInstructionAnnotation {
                    method: method.to_string(),
                    reason: format!("opcode {code:#04x} takes no length prefix"),
                });
            }
            if operand.len() != size.len {
                return Err(CodegenError::BadInstructionAnnotation {
                    method: method.to_string(),
                    reason: format!(
                        "opcode {code:#04x} wants {} operand bytes, got {}",
                        size.len,
                        operand.len()
                    ),
                });
            }
        }
        let mut bytes = prefix.clone();
        bytes.extend_from_slice(operand);
        out.push((opcode, bytes));
    }
    Ok(out)
}
