#![deny(missing_docs)]

//! # Merge-Class Processor
//!
//! Parse both files -> merge -> re-print the merged destination -> atomic
//! write. The source file is read-only; only the destination is rewritten.

use super::ProcessorOutcome;
use crate::error::EngineResult;
use crate::fs::Filesystem;
use crate::manifest::MergeOperation;
use crate::merger;
use crate::parser;
use crate::printer;

/// Executes a class merge across two files.
#[derive(Debug)]
pub struct MergeClassProcessor {
    op: MergeOperation,
    fs: Filesystem,
}

impl MergeClassProcessor {
    pub(crate) fn new(op: MergeOperation, fs: Filesystem) -> Self {
        MergeClassProcessor { op, fs }
    }

    /// Runs the merge. Aborts before writing on any parse or merge failure.
    pub fn run(&self) -> EngineResult<ProcessorOutcome> {
        let dest_code = self.fs.read(&self.op.destination)?;
        let destination = parser::parse_source(&dest_code, &self.op.destination)?;

        let src_code = self.fs.read(&self.op.source)?;
        let source = parser::parse_source(&src_code, &self.op.source)?;

        let outcome =
            merger::merge_class(&destination, &source, &self.op.class, self.op.policy)?;
        let output = printer::print_tree(&outcome.tree);
        self.fs.write_atomic(&self.op.destination, &output)?;

        tracing::info!(
            destination = %self.op.destination.display(),
            class = %self.op.class,
            added_fields = outcome.added_fields.len(),
            added_methods = outcome.added_methods.len(),
            conflicts = outcome.conflicts.len(),
            "merge written"
        );
        Ok(ProcessorOutcome::Merged {
            path: self.op.destination.clone(),
            added_fields: outcome.added_fields,
            added_methods: outcome.added_methods,
            conflicts: outcome.conflicts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merger::MergePolicy;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_merge_processor_rewrites_destination_only() {
        let dir = tempdir().unwrap();
        let dest_path = dir.path().join("dest.rs");
        let src_path = dir.path().join("patch.rs");

        fs::write(&dest_path, "pub struct Account { pub id: i32 }\n").unwrap();
        let src_code = "pub struct Account { pub balance: i64 }\n";
        fs::write(&src_path, src_code).unwrap();

        let processor = MergeClassProcessor::new(
            MergeOperation {
                destination: dest_path.clone(),
                source: src_path.clone(),
                class: "Account".into(),
                policy: MergePolicy::Skip,
            },
            Filesystem,
        );

        match processor.run().unwrap() {
            ProcessorOutcome::Merged { added_fields, .. } => {
                assert_eq!(added_fields, vec!["balance"]);
            }
            other => panic!("expected merged outcome, got {:?}", other),
        }

        let merged = fs::read_to_string(&dest_path).unwrap();
        assert!(merged.contains("pub id: i32"));
        assert!(merged.contains("pub balance: i64"));
        // Source untouched.
        assert_eq!(fs::read_to_string(&src_path).unwrap(), src_code);
    }

    #[test]
    fn test_merge_processor_does_not_write_on_failure() {
        let dir = tempdir().unwrap();
        let dest_path = dir.path().join("dest.rs");
        let src_path = dir.path().join("patch.rs");

        let dest_code = "pub struct Other;\n";
        fs::write(&dest_path, dest_code).unwrap();
        fs::write(&src_path, "pub struct Account { pub balance: i64 }\n").unwrap();

        let processor = MergeClassProcessor::new(
            MergeOperation {
                destination: dest_path.clone(),
                source: src_path,
                class: "Account".into(),
                policy: MergePolicy::Skip,
            },
            Filesystem,
        );

        assert!(processor.run().is_err());
        // Destination is byte-for-byte what it was.
        assert_eq!(fs::read_to_string(&dest_path).unwrap(), dest_code);
    }
}
