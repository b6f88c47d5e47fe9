use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use lyra_codegen::{compile, CompileOptions, SourceLocator};
use lyra_ir::DirResolver;

#[derive(Parser)]
#[command(name = "lyrac")]
#[command(about = "Lyra IR to LyraVM bytecode compiler", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the contract's IR class files
    classes: PathBuf,

    /// Fully qualified contract class, e.g. demo.Token
    contract: String,

    /// Output directory (defaults to the class directory)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Source directory for debug symbols; may repeat
    #[arg(long = "source-dir")]
    source_dirs: Vec<PathBuf>,

    /// Source file extension used when searching source directories
    #[arg(long, default_value = "lyra")]
    source_ext: String,

    /// Skip the debug symbol file
    #[arg(long)]
    no_debug: bool,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = DirResolver::new(&cli.classes);
    let options = CompileOptions {
        source_locators: cli
            .source_dirs
            .iter()
            .map(|dir| SourceLocator::dir(dir, cli.source_ext.clone()))
            .collect(),
        ..CompileOptions::default()
    };

    let artifacts = compile(&resolver, &cli.contract, &options)?;

    let out = cli.out.unwrap_or_else(|| cli.classes.clone());
    fs::create_dir_all(&out)?;
    let stem = cli.contract.rsplit('.').next().unwrap_or(&cli.contract);

    fs::write(out.join(format!("{stem}.lef")), artifacts.lef.to_bytes())?;
    fs::write(
        out.join(format!("{stem}.manifest.json")),
        serde_json::to_vec_pretty(&artifacts.manifest)?,
    )?;
    if !cli.no_debug {
        fs::write(
            out.join(format!("{stem}.debug.json")),
            serde_json::to_vec_pretty(&artifacts.debug)?,
        )?;
    }

    println!("{}", artifacts.script_hash);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
