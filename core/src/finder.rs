#![deny(missing_docs)]

//! # Finder
//!
//! Structural search over a parsed tree. A [`SearchSpec`] names a construct
//! kind plus an optional name (exact) or pattern (regex), optionally scoped
//! to a named class. Matching is structural, never textual: surrounding
//! whitespace and comments are irrelevant. No match is an empty result, not
//! an error.

use crate::error::{EngineError, EngineResult};
use crate::node::{self, MatchedNode, NodeKind, SourceTree};
use crate::printer;
use regex::Regex;
use serde::{Deserialize, Serialize};
use syn::spanned::Spanned;
use syn::visit::{self, Visit};

/// Predicate describing which nodes a find or find-and-replace targets.
///
/// Immutable once constructed; searching never mutates the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSpec {
    /// Construct kind to match.
    pub kind: NodeKind,
    /// Exact name to match. Mutually exclusive with `pattern`.
    #[serde(default)]
    pub name: Option<String>,
    /// Regex the name must match. Mutually exclusive with `name`.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Restrict matches to constructs inside this class (struct name for
    /// fields, impl self type for methods).
    #[serde(default)]
    pub within: Option<String>,
}

/// Compiled form of a [`SearchSpec`], shared by the finder and the replacer.
pub(crate) struct SpecMatcher {
    kind: NodeKind,
    name: Option<String>,
    pattern: Option<Regex>,
    within: Option<String>,
}

impl SpecMatcher {
    /// Validates and compiles a spec. A spec setting both `name` and
    /// `pattern`, or carrying an invalid regex, is a manifest defect.
    pub(crate) fn new(spec: &SearchSpec) -> EngineResult<Self> {
        if spec.name.is_some() && spec.pattern.is_some() {
            return Err(EngineError::Manifest(
                "search spec sets both `name` and `pattern`; use exactly one".into(),
            ));
        }
        let pattern = spec
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|err| EngineError::Manifest(format!("invalid search pattern: {}", err)))?;
        Ok(SpecMatcher {
            kind: spec.kind,
            name: spec.name.clone(),
            pattern,
            within: spec.within.clone(),
        })
    }

    pub(crate) fn kind(&self) -> NodeKind {
        self.kind
    }

    fn name_ok(&self, candidate: &str) -> bool {
        match (&self.name, &self.pattern) {
            (Some(name), _) => name == candidate,
            (None, Some(pattern)) => pattern.is_match(candidate),
            (None, None) => true,
        }
    }

    fn class_ok(&self, class: Option<&str>) -> bool {
        match &self.within {
            None => true,
            Some(within) => class == Some(within.as_str()),
        }
    }

    /// Whether a construct of `kind` named `name` inside `class` satisfies
    /// the spec.
    pub(crate) fn hits(&self, kind: NodeKind, name: &str, class: Option<&str>) -> bool {
        kind == self.kind && self.name_ok(name) && self.class_ok(class)
    }
}

/// Finds every construct in the tree satisfying the spec, in pre-order
/// (document) order. Zero matches yields an empty sequence.
pub fn find(tree: &SourceTree, spec: &SearchSpec) -> EngineResult<Vec<MatchedNode>> {
    let matcher = SpecMatcher::new(spec)?;
    let mut visitor = FindVisitor {
        matcher: &matcher,
        class: None,
        matches: Vec::new(),
    };
    visitor.visit_file(&tree.file);
    Ok(visitor.matches)
}

struct FindVisitor<'a> {
    matcher: &'a SpecMatcher,
    class: Option<String>,
    matches: Vec<MatchedNode>,
}

impl<'ast> Visit<'ast> for FindVisitor<'_> {
    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        let name = node.ident.to_string();
        if self.matcher.hits(NodeKind::Struct, &name, self.class.as_deref()) {
            self.matches.push(MatchedNode::new(
                NodeKind::Struct,
                &name,
                self.class.clone(),
                node.span(),
                printer::print_item(&syn::Item::Struct(node.clone())),
            ));
        }
        // Properties are the named fields of the struct itself; fields of
        // enum variants or tuple structs are not addressable members.
        if self.matcher.kind() == NodeKind::Field {
            if let syn::Fields::Named(named) = &node.fields {
                for field in &named.named {
                    if let Some(ident) = &field.ident {
                        let field_name = ident.to_string();
                        if self
                            .matcher
                            .hits(NodeKind::Field, &field_name, Some(name.as_str()))
                        {
                            self.matches.push(MatchedNode::new(
                                NodeKind::Field,
                                &field_name,
                                Some(name.clone()),
                                field.span(),
                                printer::print_field(field),
                            ));
                        }
                    }
                }
            }
        }
        visit::visit_item_struct(self, node);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        let name = node.ident.to_string();
        if self.matcher.hits(NodeKind::Enum, &name, self.class.as_deref()) {
            self.matches.push(MatchedNode::new(
                NodeKind::Enum,
                &name,
                self.class.clone(),
                node.span(),
                printer::print_item(&syn::Item::Enum(node.clone())),
            ));
        }
        visit::visit_item_enum(self, node);
    }

    fn visit_item_trait(&mut self, node: &'ast syn::ItemTrait) {
        let name = node.ident.to_string();
        if self.matcher.hits(NodeKind::Trait, &name, self.class.as_deref()) {
            self.matches.push(MatchedNode::new(
                NodeKind::Trait,
                &name,
                self.class.clone(),
                node.span(),
                printer::print_item(&syn::Item::Trait(node.clone())),
            ));
        }
        visit::visit_item_trait(self, node);
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        let name = node.sig.ident.to_string();
        if self
            .matcher
            .hits(NodeKind::Function, &name, self.class.as_deref())
        {
            self.matches.push(MatchedNode::new(
                NodeKind::Function,
                &name,
                self.class.clone(),
                node.span(),
                printer::print_item(&syn::Item::Fn(node.clone())),
            ));
        }
        visit::visit_item_fn(self, node);
    }

    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        let name = node::self_ty_name(node);
        if let Some(impl_name) = &name {
            if self
                .matcher
                .hits(NodeKind::Impl, impl_name, self.class.as_deref())
            {
                self.matches.push(MatchedNode::new(
                    NodeKind::Impl,
                    impl_name,
                    self.class.clone(),
                    node.span(),
                    printer::print_item(&syn::Item::Impl(node.clone())),
                ));
            }
        }
        let saved = self.class.take();
        self.class = name;
        visit::visit_item_impl(self, node);
        self.class = saved;
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        let name = node.sig.ident.to_string();
        if self
            .matcher
            .hits(NodeKind::Method, &name, self.class.as_deref())
        {
            self.matches.push(MatchedNode::new(
                NodeKind::Method,
                &name,
                self.class.clone(),
                node.span(),
                printer::print_method(node),
            ));
        }
        visit::visit_impl_item_fn(self, node);
    }
}
