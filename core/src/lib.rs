#![deny(missing_docs)]

//! # restruct-core
//!
//! Core library for the manifest-driven structural refactoring engine.
//!
//! A manifest declares one refactor intent (find, find-and-replace, or
//! merge-class) and the engine runs it end-to-end:
//! manifest -> resolver -> factory -> processor ->
//! {parse -> find/merge/build -> print -> atomic write} -> typed outcome.
//!
//! - **node**: the AST node model (kinds, spans, matched-node descriptors).
//! - **parser**: source text -> tree, plus snippet parsing for payloads.
//! - **printer**: tree -> source text (round-trip stable).
//! - **finder**: structural search over a tree.
//! - **builder**: synthesizes a class from a declarative description.
//! - **merger**: merges one class into another under a named conflict policy.
//! - **manifest**: manifest model and operation resolution.
//! - **processor**: per-operation orchestration and the factory.
//! - **fs**: the filesystem collaborator (atomic writes).

/// Shared error types.
pub mod error;

/// AST node model.
pub mod node;

/// Source parsing.
pub mod parser;

/// AST re-emission.
pub mod printer;

/// Structural search.
pub mod finder;

/// Class synthesis from descriptions.
pub mod builder;

/// Class merging.
pub mod merger;

/// Manifest model and resolution.
pub mod manifest;

/// Processors and their factory.
pub mod processor;

/// Filesystem collaborator.
pub mod fs;

pub use builder::{
    build_class, BuiltClass, ClassDescription, FieldDescription, MethodDescription,
    ParamDescription,
};
pub use error::{EngineError, EngineResult};
pub use finder::{find, SearchSpec};
pub use fs::Filesystem;
pub use manifest::{
    from_yaml_str, resolve, FindOperation, ManifestFile, MergeOperation, Operation, OperationKind,
    ReplaceOperation,
};
pub use merger::{merge_class, MemberConflict, MergeOutcome, MergePolicy};
pub use node::{MatchedNode, NodeKind, SourceTree, Span};
pub use parser::{parse_replacement, parse_source, Replacement};
pub use printer::{print_item, print_items, print_tree};
pub use processor::{
    FindAndReplaceProcessor, FindProcessor, MergeClassProcessor, Processor, ProcessorFactory,
    ProcessorOutcome,
};
