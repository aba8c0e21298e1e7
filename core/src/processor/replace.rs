#![deny(missing_docs)]

//! # Find-and-Replace Processor
//!
//! Parse -> find -> substitute every match in a cloned tree -> re-print ->
//! atomic write. Zero matches is a no-op success: the input file is left
//! byte-for-byte untouched. Multiple matches are all replaced, in document
//! order.

use super::ProcessorOutcome;
use crate::error::EngineResult;
use crate::finder::{self, SearchSpec, SpecMatcher};
use crate::fs::Filesystem;
use crate::manifest::ReplaceOperation;
use crate::node::{self, NodeKind, SourceTree};
use crate::parser::{self, Replacement};
use crate::printer;
use syn::visit_mut::{self, VisitMut};
use syn::{Fields, ImplItem, Item};

/// Executes a structural find-and-replace on one file.
#[derive(Debug)]
pub struct FindAndReplaceProcessor {
    op: ReplaceOperation,
    fs: Filesystem,
}

impl FindAndReplaceProcessor {
    pub(crate) fn new(op: ReplaceOperation, fs: Filesystem) -> Self {
        FindAndReplaceProcessor { op, fs }
    }

    /// Runs the rewrite. The original tree is never mutated; substitution
    /// happens in a clone that is only committed once fully printed.
    pub fn run(&self) -> EngineResult<ProcessorOutcome> {
        let code = self.fs.read(&self.op.file)?;
        let tree = parser::parse_source(&code, &self.op.file)?;

        let matches = finder::find(&tree, &self.op.spec)?;
        if matches.is_empty() {
            tracing::info!(file = %self.op.file.display(), "no matches; file untouched");
            return Ok(ProcessorOutcome::Written {
                path: self.op.file.clone(),
                changed: false,
            });
        }

        let replacement = parser::parse_replacement(self.op.spec.kind, &self.op.replacement)?;
        let (new_tree, replaced) = replace_in_tree(&tree, &self.op.spec, &replacement)?;
        let output = printer::print_tree(&new_tree);
        self.fs.write_atomic(&self.op.file, &output)?;

        tracing::info!(
            file = %self.op.file.display(),
            replaced,
            "replacements written"
        );
        Ok(ProcessorOutcome::Written {
            path: self.op.file.clone(),
            changed: true,
        })
    }
}

/// Substitutes every construct matching `spec` with `replacement`, in a
/// clone of the tree. Returns the new tree and the substitution count.
pub(crate) fn replace_in_tree(
    tree: &SourceTree,
    spec: &SearchSpec,
    replacement: &Replacement,
) -> EngineResult<(SourceTree, usize)> {
    let matcher = SpecMatcher::new(spec)?;
    let mut file = tree.file.clone();
    let mut visitor = ReplaceVisitor {
        matcher: &matcher,
        replacement,
        class: None,
        replaced: 0,
    };
    visitor.visit_file_mut(&mut file);
    Ok((
        SourceTree {
            file,
            path: tree.path.clone(),
        },
        visitor.replaced,
    ))
}

struct ReplaceVisitor<'a> {
    matcher: &'a SpecMatcher,
    replacement: &'a Replacement,
    class: Option<String>,
    replaced: usize,
}

impl VisitMut for ReplaceVisitor<'_> {
    fn visit_item_mut(&mut self, item: &mut Item) {
        if let Replacement::Item(new_item) = self.replacement {
            let class = self.class.as_deref();
            let hit = match &*item {
                Item::Struct(s) => {
                    self.matcher
                        .hits(NodeKind::Struct, &s.ident.to_string(), class)
                }
                Item::Enum(e) => self.matcher.hits(NodeKind::Enum, &e.ident.to_string(), class),
                Item::Trait(t) => {
                    self.matcher
                        .hits(NodeKind::Trait, &t.ident.to_string(), class)
                }
                Item::Fn(f) => {
                    self.matcher
                        .hits(NodeKind::Function, &f.sig.ident.to_string(), class)
                }
                Item::Impl(imp) => node::self_ty_name(imp)
                    .map(|name| self.matcher.hits(NodeKind::Impl, &name, class))
                    .unwrap_or(false),
                _ => false,
            };
            if hit {
                *item = (**new_item).clone();
                self.replaced += 1;
                // The substituted subtree is not searched again.
                return;
            }
        }
        visit_mut::visit_item_mut(self, item);
    }

    fn visit_item_impl_mut(&mut self, node: &mut syn::ItemImpl) {
        let saved = self.class.take();
        self.class = node::self_ty_name(node);
        visit_mut::visit_item_impl_mut(self, node);
        self.class = saved;
    }

    fn visit_impl_item_mut(&mut self, node: &mut ImplItem) {
        if let (Replacement::Method(new_method), ImplItem::Fn(existing)) =
            (self.replacement, &*node)
        {
            let name = existing.sig.ident.to_string();
            if self
                .matcher
                .hits(NodeKind::Method, &name, self.class.as_deref())
            {
                *node = ImplItem::Fn((**new_method).clone());
                self.replaced += 1;
                return;
            }
        }
        visit_mut::visit_impl_item_mut(self, node);
    }

    fn visit_item_struct_mut(&mut self, node: &mut syn::ItemStruct) {
        if let Replacement::Field(new_field) = self.replacement {
            let class = node.ident.to_string();
            if let Fields::Named(named) = &mut node.fields {
                for field in named.named.iter_mut() {
                    let hit = field
                        .ident
                        .as_ref()
                        .map(|ident| {
                            self.matcher
                                .hits(NodeKind::Field, &ident.to_string(), Some(class.as_str()))
                        })
                        .unwrap_or(false);
                    if hit {
                        *field = (**new_field).clone();
                        self.replaced += 1;
                    }
                }
            }
        }
        visit_mut::visit_item_struct_mut(self, node);
    }
}
