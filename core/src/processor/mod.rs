#![deny(missing_docs)]

//! # Processors
//!
//! One processor per operation kind, each orchestrating
//! parse -> (find | replace | merge) -> optional print + atomic write, and
//! returning a single typed outcome. The factory is constructed with the
//! collaborators it injects (today just the filesystem), so tests can
//! substitute their own without touching process-wide state. Dispatch is an
//! exhaustive match over the resolved operation: every kind the resolver
//! can emit has a processor by construction.

mod find;
mod merge;
mod replace;

pub use find::FindProcessor;
pub use merge::MergeClassProcessor;
pub use replace::FindAndReplaceProcessor;

use crate::error::EngineResult;
use crate::fs::Filesystem;
use crate::manifest::{self, ManifestFile, Operation};
use crate::merger::MemberConflict;
use crate::node::MatchedNode;
use serde::Serialize;
use std::path::PathBuf;

/// Terminal result of one processor invocation.
#[derive(Debug, Serialize)]
pub enum ProcessorOutcome {
    /// Matches of a find, in document order.
    Matches {
        /// File that was searched.
        path: PathBuf,
        /// The matched constructs.
        matches: Vec<MatchedNode>,
    },
    /// Result of a find-and-replace.
    Written {
        /// File the operation targeted.
        path: PathBuf,
        /// Whether the file was rewritten. `false` means zero matches: the
        /// file was left byte-for-byte untouched.
        changed: bool,
    },
    /// Result of a class merge.
    Merged {
        /// Destination file that was rewritten.
        path: PathBuf,
        /// Fields cloned into the destination class.
        added_fields: Vec<String>,
        /// Methods cloned into the destination class.
        added_methods: Vec<String>,
        /// Members that existed in both classes with differing content.
        conflicts: Vec<MemberConflict>,
    },
}

/// A processor bound to its operation parameters, ready to execute.
#[derive(Debug)]
pub enum Processor {
    /// Read-only search.
    Find(FindProcessor),
    /// Search plus rewrite.
    FindAndReplace(FindAndReplaceProcessor),
    /// Two-file class merge.
    MergeClass(MergeClassProcessor),
}

impl Processor {
    /// Runs the operation to completion, aborting on the first failure.
    /// No write ever happens after a transformation failure.
    pub fn execute(&self) -> EngineResult<ProcessorOutcome> {
        match self {
            Processor::Find(processor) => processor.run(),
            Processor::FindAndReplace(processor) => processor.run(),
            Processor::MergeClass(processor) => processor.run(),
        }
    }
}

/// Builds the processor for a manifest's resolved operation.
#[derive(Debug, Clone, Default)]
pub struct ProcessorFactory {
    fs: Filesystem,
}

impl ProcessorFactory {
    /// A factory injecting the given filesystem collaborator.
    pub fn new(fs: Filesystem) -> Self {
        ProcessorFactory { fs }
    }

    /// Resolves the manifest and binds the matching processor.
    ///
    /// Total over every operation kind the resolver emits; the match below
    /// is exhaustive, so an unsupported kind cannot reach here.
    pub fn create(&self, manifest: &ManifestFile) -> EngineResult<Processor> {
        let operation = manifest::resolve(manifest)?;
        tracing::debug!(kind = %operation.kind(), "processor selected");
        Ok(match operation {
            Operation::Find(op) => Processor::Find(FindProcessor::new(op, self.fs)),
            Operation::FindAndReplace(op) => {
                Processor::FindAndReplace(FindAndReplaceProcessor::new(op, self.fs))
            }
            Operation::MergeClass(op) => {
                Processor::MergeClass(MergeClassProcessor::new(op, self.fs))
            }
        })
    }

    /// Convenience: resolve, bind, and execute in one step.
    pub fn execute(&self, manifest: &ManifestFile) -> EngineResult<ProcessorOutcome> {
        self.create(manifest)?.execute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::SearchSpec;
    use crate::manifest::{FindOperation, MergeOperation, ReplaceOperation};
    use crate::merger::MergePolicy;
    use crate::node::NodeKind;

    fn spec() -> SearchSpec {
        SearchSpec {
            kind: NodeKind::Struct,
            name: Some("Widget".into()),
            pattern: None,
            within: None,
        }
    }

    /// Every resolver-emitted kind has a registered processor.
    #[test]
    fn test_factory_is_total_over_operation_kinds() {
        let factory = ProcessorFactory::default();

        let find = ManifestFile {
            find: Some(FindOperation {
                file: PathBuf::from("a.rs"),
                spec: spec(),
            }),
            ..Default::default()
        };
        assert!(matches!(
            factory.create(&find).unwrap(),
            Processor::Find(_)
        ));

        let replace = ManifestFile {
            find_and_replace: Some(ReplaceOperation {
                file: PathBuf::from("a.rs"),
                spec: spec(),
                replacement: "struct Widget;".into(),
            }),
            ..Default::default()
        };
        assert!(matches!(
            factory.create(&replace).unwrap(),
            Processor::FindAndReplace(_)
        ));

        let merge = ManifestFile {
            merge_class: Some(MergeOperation {
                destination: PathBuf::from("a.rs"),
                source: PathBuf::from("b.rs"),
                class: "Widget".into(),
                policy: MergePolicy::default(),
            }),
            ..Default::default()
        };
        assert!(matches!(
            factory.create(&merge).unwrap(),
            Processor::MergeClass(_)
        ));
    }

    #[test]
    fn test_factory_propagates_resolver_failure() {
        let factory = ProcessorFactory::default();
        assert!(factory.create(&ManifestFile::default()).is_err());
    }
}
