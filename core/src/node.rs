#![deny(missing_docs)]

//! # Node Model
//!
//! The in-memory AST representation the pipeline operates on.
//!
//! A parsed file is held as a [`SourceTree`] (an owned `syn::File` plus the
//! path it came from). Search results are reported as [`MatchedNode`]
//! descriptors: construct kind, name, enclosing class, source span, and the
//! re-printed snippet. Trees own their nodes outright; transformations clone
//! the tree and never alias subtrees across mutation boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The syntactic construct kinds the engine can search for and replace.
///
/// "Class" maps onto Rust as a named struct plus its inherent impl blocks,
/// so a method is an associated `fn` and a property is a named field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A `struct` item.
    Struct,
    /// An `enum` item.
    Enum,
    /// A `trait` item.
    Trait,
    /// A free `fn` item.
    Function,
    /// An associated `fn` inside an impl block.
    Method,
    /// A named field of a struct.
    Field,
    /// An `impl` block, identified by its self type.
    Impl,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeKind::Struct => "struct",
            NodeKind::Enum => "enum",
            NodeKind::Trait => "trait",
            NodeKind::Function => "function",
            NodeKind::Method => "method",
            NodeKind::Field => "field",
            NodeKind::Impl => "impl",
        };
        write!(f, "{}", label)
    }
}

/// Source position of a construct, 1-based lines and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Line the construct starts on.
    pub start_line: usize,
    /// Column the construct starts on.
    pub start_column: usize,
    /// Line the construct ends on.
    pub end_line: usize,
    /// Column the construct ends on.
    pub end_column: usize,
}

impl Span {
    /// Converts a proc-macro2 span (0-based columns) into 1-based positions.
    pub(crate) fn from_syn(span: proc_macro2::Span) -> Self {
        let start = span.start();
        let end = span.end();
        Span {
            start_line: start.line,
            start_column: start.column + 1,
            end_line: end.line,
            end_column: end.column + 1,
        }
    }
}

/// One search hit: an owned descriptor of a matched construct.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedNode {
    /// Kind of the matched construct.
    pub kind: NodeKind,
    /// Name of the matched construct.
    pub name: String,
    /// Enclosing class, when the construct sits inside a struct or impl.
    pub class: Option<String>,
    /// Position in the searched file.
    pub span: Span,
    /// Re-printed snippet of the construct.
    pub text: String,
}

impl MatchedNode {
    pub(crate) fn new(
        kind: NodeKind,
        name: impl Into<String>,
        class: Option<String>,
        span: proc_macro2::Span,
        text: String,
    ) -> Self {
        MatchedNode {
            kind,
            name: name.into(),
            class,
            span: Span::from_syn(span),
            text,
        }
    }
}

/// A parsed source file: the owned AST plus the path it was read from.
///
/// Every tree owns its nodes; no node is shared between two trees.
#[derive(Debug, Clone)]
pub struct SourceTree {
    /// The parsed file.
    pub file: syn::File,
    /// Path the file was read from.
    pub path: PathBuf,
}

/// Extracts the self-type name of an impl block (`impl Widget { .. }` or
/// `impl Display for Widget { .. }` both yield `Widget`).
pub(crate) fn self_ty_name(imp: &syn::ItemImpl) -> Option<String> {
    if let syn::Type::Path(type_path) = &*imp.self_ty {
        type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_serde_names() {
        let kind: NodeKind = serde_yaml::from_str("method").unwrap();
        assert_eq!(kind, NodeKind::Method);
        assert_eq!(serde_yaml::to_string(&NodeKind::Struct).unwrap().trim(), "struct");
    }

    #[test]
    fn test_self_ty_name() {
        let imp: syn::ItemImpl = syn::parse_str("impl Widget { fn a(&self) {} }").unwrap();
        assert_eq!(self_ty_name(&imp).as_deref(), Some("Widget"));

        let trait_imp: syn::ItemImpl =
            syn::parse_str("impl std::fmt::Debug for Widget { }").unwrap();
        assert_eq!(self_ty_name(&trait_imp).as_deref(), Some("Widget"));
    }
}
