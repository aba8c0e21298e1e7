#![deny(missing_docs)]

//! # Manifest Resolution
//!
//! A manifest is the declarative description of one refactor intent. The
//! raw, deserialized [`ManifestFile`] carries one optional section per
//! supported operation; [`resolve`] turns it into the closed [`Operation`]
//! union, failing when zero or more than one section is populated. The
//! match over `Operation` downstream is exhaustive at compile time, so a
//! resolver-emitted kind can never reach an unregistered branch.

use crate::error::{EngineError, EngineResult};
use crate::finder::{SearchSpec, SpecMatcher};
use crate::merger::MergePolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Raw manifest value, as loaded from YAML. Exactly one of the sections
/// must be populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestFile {
    /// Locate constructs matching a pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find: Option<FindOperation>,
    /// Locate constructs and replace them with a given snippet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find_and_replace: Option<ReplaceOperation>,
    /// Merge a class from one file into another.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_class: Option<MergeOperation>,
}

/// Parameters of a find operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindOperation {
    /// File to search.
    pub file: PathBuf,
    /// What to search for.
    pub spec: SearchSpec,
}

/// Parameters of a find-and-replace operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceOperation {
    /// File to rewrite.
    pub file: PathBuf,
    /// What to search for.
    pub spec: SearchSpec,
    /// Replacement construct, as Rust source of the spec's kind.
    pub replacement: String,
}

/// Parameters of a merge-class operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeOperation {
    /// File whose class receives the merged members.
    pub destination: PathBuf,
    /// File contributing members.
    pub source: PathBuf,
    /// Name of the class present in both files.
    pub class: String,
    /// Conflict policy; defaults to `skip`.
    #[serde(default)]
    pub policy: MergePolicy,
}

/// The three operation kinds the engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Read-only structural search.
    Find,
    /// Search plus in-place rewrite.
    FindAndReplace,
    /// Class merge across two files.
    MergeClass,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OperationKind::Find => "find",
            OperationKind::FindAndReplace => "find_and_replace",
            OperationKind::MergeClass => "merge_class",
        };
        write!(f, "{}", label)
    }
}

/// A resolved operation with its typed parameters. Closed union: the
/// processor factory matches over it exhaustively.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Resolved find.
    Find(FindOperation),
    /// Resolved find-and-replace.
    FindAndReplace(ReplaceOperation),
    /// Resolved merge.
    MergeClass(MergeOperation),
}

impl Operation {
    /// The kind this operation resolves to.
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Find(_) => OperationKind::Find,
            Operation::FindAndReplace(_) => OperationKind::FindAndReplace,
            Operation::MergeClass(_) => OperationKind::MergeClass,
        }
    }
}

/// Loads a manifest from YAML text.
pub fn from_yaml_str(raw: &str) -> EngineResult<ManifestFile> {
    serde_yaml::from_str(raw).map_err(|err| EngineError::Manifest(format!("{}", err)))
}

/// Determines which operation the manifest declares.
///
/// Deterministic: a given manifest value always resolves to the same
/// operation. Fails when zero or more than one section is populated, or
/// when a search spec is internally invalid.
pub fn resolve(manifest: &ManifestFile) -> EngineResult<Operation> {
    match (
        &manifest.find,
        &manifest.find_and_replace,
        &manifest.merge_class,
    ) {
        (Some(op), None, None) => {
            SpecMatcher::new(&op.spec)?;
            Ok(Operation::Find(op.clone()))
        }
        (None, Some(op), None) => {
            SpecMatcher::new(&op.spec)?;
            Ok(Operation::FindAndReplace(op.clone()))
        }
        (None, None, Some(op)) => Ok(Operation::MergeClass(op.clone())),
        (None, None, None) => Err(EngineError::Manifest(
            "manifest declares no supported operation \
             (expected one of: find, find_and_replace, merge_class)"
                .into(),
        )),
        _ => {
            let mut declared = Vec::new();
            if manifest.find.is_some() {
                declared.push("find");
            }
            if manifest.find_and_replace.is_some() {
                declared.push("find_and_replace");
            }
            if manifest.merge_class.is_some() {
                declared.push("merge_class");
            }
            Err(EngineError::Manifest(format!(
                "manifest declares multiple operations: {}",
                declared.join(", ")
            )))
        }
    }
}
