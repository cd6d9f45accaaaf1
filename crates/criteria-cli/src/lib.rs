//! Command line front end for the criteria compiler.
//!
//! ```text
//! criteria compile tree.json --namespaces namespaces.yaml
//! echo '{"id":"r","nodeType":"RULE",...}' | criteria compile -
//! criteria operations
//! ```
//!
//! The binary is a thin wrapper: [`Cli`] is parsed by `main`, and [`run`]
//! does the work against an arbitrary reader and writer so it can be tested
//! without a process.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use criteria::{Compiler, OperationRegistry, QuerySyntax};
use criteria_fts::{NamespaceResolver, PrefixResolver};
use tracing_subscriber::EnvFilter;

/// Compile criteria trees into search query fragments.
#[derive(Debug, Parser)]
#[command(name = "criteria", version, about)]
pub struct Cli {
    /// Log compiler activity to stderr (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// YAML file describing namespace prefixes and field mappings
    #[arg(long, global = true, value_name = "FILE")]
    pub namespaces: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a JSON criteria tree and print the query fragment
    Compile {
        /// Path to the tree, or `-` to read standard input
        tree: PathBuf,

        /// YAML file overriding delimiters, junction tokens and boost markers
        #[arg(long, value_name = "FILE")]
        syntax: Option<PathBuf>,
    },

    /// List the registered operations in match order
    Operations,
}

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over `-v`.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Executes `cli`, reading a `-` tree from `input` and writing results to `out`.
pub fn run(cli: &Cli, input: &mut dyn Read, out: &mut dyn Write) -> Result<()> {
    let resolver = load_resolver(cli.namespaces.as_deref())?;
    let registry = criteria_fts::registry(resolver).context("failed to build operation registry")?;

    match &cli.command {
        Command::Compile { tree, syntax } => {
            let syntax = match syntax {
                Some(path) => QuerySyntax::from_file(path)
                    .with_context(|| format!("failed to load syntax from {}", path.display()))?,
                None => QuerySyntax::default(),
            };
            let document = read_tree(tree, input)?;
            let fragment = compile_document(&document, registry, syntax)?;
            writeln!(out, "{fragment}")?;
        }
        Command::Operations => write_operations(&registry, out)?,
    }
    Ok(())
}

/// Decodes a JSON document and compiles it.
pub fn compile_document(
    document: &str,
    registry: OperationRegistry,
    syntax: QuerySyntax,
) -> Result<String> {
    let tree = criteria::from_json(document).context("failed to decode criteria tree")?;
    let compiler = Compiler::with_syntax(Arc::new(registry), syntax);
    let fragment = compiler
        .compile(&tree)
        .with_context(|| format!("failed to compile tree '{}'", tree.id()))?;
    Ok(fragment)
}

fn load_resolver(path: Option<&Path>) -> Result<Arc<dyn NamespaceResolver>> {
    let resolver = match path {
        Some(path) => PrefixResolver::from_file(path)
            .with_context(|| format!("failed to load namespaces from {}", path.display()))?,
        None => PrefixResolver::default(),
    };
    Ok(Arc::new(resolver))
}

fn read_tree(path: &Path, input: &mut dyn Read) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut document = String::new();
        input
            .read_to_string(&mut document)
            .context("failed to read tree from stdin")?;
        return Ok(document);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_operations(registry: &OperationRegistry, out: &mut dyn Write) -> Result<()> {
    let width = registry
        .iter()
        .map(|entry| entry.signature().to_string().len())
        .max()
        .unwrap_or(0);
    for entry in registry.iter() {
        writeln!(
            out,
            "{:>4}  {:<width$}  {}",
            entry.priority(),
            entry.signature().to_string(),
            entry.name(),
        )?;
    }
    Ok(())
}
