//! The compilation pipeline.

use tracing::{info, info_span};

use lyra_contract::manifest::Manifest;
use lyra_contract::{ContractHash, LefFile};
use lyra_ir::ClassResolver;

use crate::debug::sourcelookup::SourceLocator;
use crate::debug::{self, DebugInfo};
use crate::error::Result;
use crate::{manifest, translator, walker};

/// Written into the container's compiler identification field.
pub const COMPILER_NAME: &str = concat!("lyrac-", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub compiler_name: String,
    /// Tried in order when locating sources for debug symbols.
    pub source_locators: Vec<SourceLocator>,
}

impl Default for CompileOptions {
    fn default() -> CompileOptions {
        CompileOptions { compiler_name: COMPILER_NAME.to_string(), source_locators: Vec::new() }
    }
}

/// Everything a successful compilation produces. Artifacts only exist as a
/// complete set; any error during the pipeline yields none of them.
#[derive(Debug)]
pub struct Artifacts {
    pub lef: LefFile,
    pub manifest: Manifest,
    pub debug: DebugInfo,
    pub script_hash: ContractHash,
}

/// Compiles the named contract class and packages the result.
pub fn compile(
    resolver: &dyn ClassResolver,
    contract: &str,
    options: &CompileOptions,
) -> Result<Artifacts> {
    let span = info_span!("compile", contract);
    let _guard = span.enter();

    let walk = walker::walk(resolver, contract)?;
    let mut module = translator::translate(&walk)?;
    module.finalize()?;

    let script = module.script();
    let script_hash = ContractHash::of_script(&script);
    let source = walk.contract.source_url().unwrap_or("").to_string();
    let tokens = module.tokens.iter().cloned().collect();

    let lef = LefFile::new(&options.compiler_name, &source, tokens, script)?;
    let manifest = manifest::build(&module, &walk);
    let debug = debug::build(&module, &walk, script_hash, &options.source_locators);

    info!(
        script_len = lef.script.len(),
        methods = module.methods.len(),
        tokens = lef.tokens.len(),
        %script_hash,
        "contract compiled"
    );
    Ok(Artifacts { lef, manifest, debug, script_hash })
}
