#![deny(missing_docs)]

//! # Run Command
//!
//! Loads a YAML manifest, executes it through the processor factory, and
//! reports the outcome as plain text or JSON.

use crate::error::{CliError, CliResult};
use restruct_core::{from_yaml_str, Filesystem, ProcessorFactory, ProcessorOutcome};
use std::fs;
use std::path::PathBuf;

/// Arguments for the run command.
#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to the YAML manifest describing one refactoring operation.
    pub manifest: PathBuf,

    /// Emit the outcome as JSON instead of plain text.
    #[clap(long)]
    pub json: bool,
}

/// Executes the manifest and prints the outcome.
pub fn execute(args: &RunArgs) -> CliResult<()> {
    let raw = fs::read_to_string(&args.manifest)?;
    let manifest = from_yaml_str(&raw)
        .map_err(|err| CliError::General(format!("{}: {}", args.manifest.display(), err)))?;

    let factory = ProcessorFactory::new(Filesystem);
    let outcome = factory.execute(&manifest)?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&outcome)
            .map_err(|err| CliError::General(err.to_string()))?;
        println!("{}", rendered);
        return Ok(());
    }

    report(&outcome);
    Ok(())
}

fn report(outcome: &ProcessorOutcome) {
    match outcome {
        ProcessorOutcome::Matches { path, matches } => {
            if matches.is_empty() {
                println!("No matches in {}.", path.display());
                return;
            }
            for hit in matches {
                let scope = hit
                    .class
                    .as_ref()
                    .map(|class| format!(" (in {})", class))
                    .unwrap_or_default();
                println!(
                    "{}:{}:{}: {} `{}`{}",
                    path.display(),
                    hit.span.start_line,
                    hit.span.start_column,
                    hit.kind,
                    hit.name,
                    scope
                );
            }
        }
        ProcessorOutcome::Written { path, changed } => {
            if *changed {
                println!("Updated {}.", path.display());
            } else {
                println!("No matches; {} left untouched.", path.display());
            }
        }
        ProcessorOutcome::Merged {
            path,
            added_fields,
            added_methods,
            conflicts,
        } => {
            println!(
                "Merged into {}: {} field(s), {} method(s) added.",
                path.display(),
                added_fields.len(),
                added_methods.len()
            );
            for conflict in conflicts {
                println!("  conflict: {} `{}`", conflict.kind, conflict.name);
            }
        }
    }
}
