#![deny(missing_docs)]

//! # Parser Module
//!
//! Converts Rust source text into the node model using `syn`. Fails with a
//! positioned [`EngineError::Parse`] on syntactically invalid input. Also
//! hosts the snippet parsers used for replacement payloads, which must parse
//! as the construct kind the search spec names.

use crate::error::{EngineError, EngineResult};
use crate::node::{NodeKind, SourceTree};
use std::path::{Path, PathBuf};

/// Pseudo-path reported for snippets that come from a manifest rather than
/// a file on disk.
const SNIPPET_PATH: &str = "<replacement>";

/// Parses a full source file into an owned tree.
pub fn parse_source(code: &str, path: &Path) -> EngineResult<SourceTree> {
    let file = syn::parse_file(code).map_err(|err| positioned(err, path.to_path_buf()))?;
    Ok(SourceTree {
        file,
        path: path.to_path_buf(),
    })
}

/// A parsed replacement payload, shaped by the search spec's kind.
#[derive(Debug, Clone)]
pub enum Replacement {
    /// A whole item: struct, enum, trait, free function, or impl block.
    Item(Box<syn::Item>),
    /// An associated function, replacing a method inside an impl block.
    Method(Box<syn::ImplItemFn>),
    /// A named field, replacing a property inside a struct.
    Field(Box<syn::Field>),
}

/// Parses a replacement snippet as the construct kind the spec targets.
///
/// A snippet that does not parse as that kind is a [`EngineError::Parse`],
/// reported against the pseudo-path `<replacement>`.
pub fn parse_replacement(kind: NodeKind, code: &str) -> EngineResult<Replacement> {
    match kind {
        NodeKind::Struct => {
            let item: syn::ItemStruct = parse_snippet(code)?;
            Ok(Replacement::Item(Box::new(syn::Item::Struct(item))))
        }
        NodeKind::Enum => {
            let item: syn::ItemEnum = parse_snippet(code)?;
            Ok(Replacement::Item(Box::new(syn::Item::Enum(item))))
        }
        NodeKind::Trait => {
            let item: syn::ItemTrait = parse_snippet(code)?;
            Ok(Replacement::Item(Box::new(syn::Item::Trait(item))))
        }
        NodeKind::Function => {
            let item: syn::ItemFn = parse_snippet(code)?;
            Ok(Replacement::Item(Box::new(syn::Item::Fn(item))))
        }
        NodeKind::Impl => {
            let item: syn::ItemImpl = parse_snippet(code)?;
            Ok(Replacement::Item(Box::new(syn::Item::Impl(item))))
        }
        NodeKind::Method => {
            let method: syn::ImplItemFn = parse_snippet(code)?;
            Ok(Replacement::Method(Box::new(method)))
        }
        NodeKind::Field => Ok(Replacement::Field(Box::new(parse_named_field(code)?))),
    }
}

/// Parses a single named field.
///
/// `syn` has no standalone grammar entry for a field, so the snippet is
/// parsed inside a carrier struct and the field node is extracted back out.
pub fn parse_named_field(code: &str) -> EngineResult<syn::Field> {
    let bare = code.trim().trim_end_matches(',');
    let carrier = format!("struct Carrier {{ {}, }}", bare);
    let item: syn::ItemStruct = syn::parse_str(&carrier)
        .map_err(|err| positioned(err, PathBuf::from(SNIPPET_PATH)))?;
    match item.fields {
        syn::Fields::Named(named) => named.named.into_iter().next().ok_or_else(|| {
            EngineError::Parse {
                message: "empty field snippet".into(),
                line: 1,
                column: 1,
                path: PathBuf::from(SNIPPET_PATH),
            }
        }),
        _ => Err(EngineError::Parse {
            message: "snippet is not a named field".into(),
            line: 1,
            column: 1,
            path: PathBuf::from(SNIPPET_PATH),
        }),
    }
}

fn parse_snippet<T: syn::parse::Parse>(code: &str) -> EngineResult<T> {
    syn::parse_str(code).map_err(|err| positioned(err, PathBuf::from(SNIPPET_PATH)))
}

/// Converts a `syn::Error` into a positioned parse error.
fn positioned(err: syn::Error, path: PathBuf) -> EngineError {
    let start = err.span().start();
    EngineError::Parse {
        message: err.to_string(),
        line: start.line,
        column: start.column + 1,
        path,
    }
}
