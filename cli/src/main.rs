#![deny(missing_docs)]

//! # restruct CLI
//!
//! Command line front end for the structural refactoring engine.
//!
//! Supported Commands:
//! - `run`: executes a YAML refactoring manifest (find, find-and-replace,
//!   or merge-class).
//! - `scaffold`: builds a class from a declarative YAML description.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod error;
mod run;
mod scaffold;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Manifest-driven structural refactoring for Rust sources")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a refactoring manifest.
    Run(run::RunArgs),
    /// Build a class skeleton from a declarative description.
    Scaffold(scaffold::ScaffoldArgs),
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Run(args) => run::execute(args),
        Commands::Scaffold(args) => scaffold::execute(args),
    }
}
