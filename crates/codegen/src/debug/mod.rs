//! Debug symbol generation.
//!
//! The debug document mirrors what debuggers expect: a deduplicated table
//! of source documents plus one record per method with its address range
//! and sequence points. A method whose source cannot be located degrades
//! to a record without sequence points; this is deliberately not an error.

pub mod sourcelookup;

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use lyra_contract::ContractHash;

use crate::index::{Idx, IndexVec};
use crate::index::DocIx;
use crate::module::Module;
use crate::walker::Walk;
use sourcelookup::{locate, SourceLocator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Script hash of the compiled contract.
    pub hash: String,
    /// Deduplicated source paths; sequence points reference them by index.
    pub documents: Vec<String>,
    pub methods: Vec<DebugMethod>,
    pub events: Vec<DebugEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugMethod {
    pub id: String,
    /// `declaring.Class,methodName`.
    pub name: String,
    /// `start-end` absolute script addresses, empty without source.
    pub range: String,
    /// `name,type` per parameter, in slot order.
    pub params: Vec<String>,
    #[serde(rename = "return")]
    pub return_type: String,
    /// `name,type` per local variable.
    pub variables: Vec<String>,
    /// `address[document]startLine:startCol-endLine:endCol`.
    #[serde(rename = "sequence-points")]
    pub sequence_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugEvent {
    pub id: String,
    pub name: String,
    pub params: Vec<String>,
}

pub(crate) fn build(
    module: &Module,
    walk: &Walk,
    script_hash: ContractHash,
    locators: &[SourceLocator],
) -> DebugInfo {
    let mut documents: IndexVec<DocIx, String> = IndexVec::new();
    let mut doc_by_path: HashMap<PathBuf, DocIx> = HashMap::new();
    let mut source_by_class: HashMap<String, Option<PathBuf>> = HashMap::new();

    let mut methods = Vec::with_capacity(module.methods.len());
    for method in &module.methods {
        let source = source_by_class
            .entry(method.class.clone())
            .or_insert_with(|| {
                let found = locate(locators, &method.class);
                if found.is_none() {
                    warn!(class = %method.class, "source not found, emitting name-only record");
                }
                found
            })
            .clone();

        let start = method.start_address.unwrap_or(0);
        let params = method
            .params
            .iter()
            .map(|(name, ty)| format!("{name},{ty}"))
            .collect();
        let variables = method
            .locals
            .iter()
            .map(|(name, ty)| format!("{name},{ty}"))
            .collect();

        let (range, sequence_points) = match source {
            Some(path) => {
                let doc = *doc_by_path.entry(path.clone()).or_insert_with(|| {
                    documents.push(path.display().to_string())
                });
                let points = method
                    .insns
                    .iter()
                    .filter_map(|insn| {
                        insn.span.map(|span| {
                            format!(
                                "{}[{}]{}:{}-{}:{}",
                                start + insn.address,
                                doc.index(),
                                span.line,
                                span.col,
                                span.end_line,
                                span.end_col
                            )
                        })
                    })
                    .collect();
                (format!("{}-{}", start, start + method.last_address()), points)
            }
            None => (String::new(), Vec::new()),
        };

        methods.push(DebugMethod {
            id: method.id.clone(),
            name: method.debug_name(),
            range,
            params,
            return_type: method.sig.ret.to_string(),
            variables,
            sequence_points,
        });
    }

    let events = walk
        .contract
        .events
        .iter()
        .map(|event| DebugEvent {
            id: format!("{}.{}", walk.contract.name, event.name),
            name: format!("{},{}", walk.contract.name, event.name),
            params: event.params.iter().map(|p| format!("{},{}", p.name, p.ty)).collect(),
        })
        .collect();

    DebugInfo {
        hash: script_hash.to_string(),
        documents: documents.into_iter().collect(),
        methods,
        events,
    }
}
