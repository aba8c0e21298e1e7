#![deny(missing_docs)]

//! # Scaffold Command
//!
//! Builds a class from a declarative YAML description and prints it to
//! stdout or writes it to a file.

use crate::error::{CliError, CliResult};
use restruct_core::{build_class, print_items, ClassDescription, Filesystem};
use std::fs;
use std::path::PathBuf;

/// Arguments for the scaffold command.
#[derive(clap::Args, Debug, Clone)]
pub struct ScaffoldArgs {
    /// Path to the YAML class description.
    pub description: PathBuf,

    /// Write the generated class to this file instead of stdout.
    #[clap(long)]
    pub out: Option<PathBuf>,
}

/// Builds the class and emits it.
pub fn execute(args: &ScaffoldArgs) -> CliResult<()> {
    let raw = fs::read_to_string(&args.description)?;
    let description: ClassDescription = serde_yaml::from_str(&raw)
        .map_err(|err| CliError::General(format!("{}: {}", args.description.display(), err)))?;

    let built = build_class(&description)?;
    let rendered = print_items(&built.into_items());

    match &args.out {
        Some(path) => {
            Filesystem.write_atomic(path, &rendered)?;
            println!("Wrote {}.", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
