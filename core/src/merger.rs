#![deny(missing_docs)]

//! # Class Merger
//!
//! Clones members (named fields, inherent methods, derive traits) from a
//! source class into the matching class of a destination tree, under an
//! explicit, deterministic conflict policy. Neither input tree is mutated;
//! the outcome carries a new destination tree.
//!
//! A member present in both classes with identical token content is
//! recognized as already merged and skipped silently, which is what makes
//! re-merging the same source a no-op. Only members that differ count as
//! conflicts.
//!
//! Classes are located among the file's top-level items; classes nested in
//! inline modules are out of a merge's reach.

use crate::error::{EngineError, EngineResult};
use crate::node::{self, NodeKind, SourceTree};
use indexmap::IndexMap;
use quote::ToTokens;
use serde::{Deserialize, Serialize};
use syn::punctuated::Punctuated;
use syn::{parse_quote, Fields, ImplItem, ImplItemFn, Item, ItemImpl, ItemStruct, Token};

/// How the merger treats a member that exists in both classes with
/// differing content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Keep the destination's member and report the conflict. The default.
    #[default]
    Skip,
    /// Replace the destination's member with the source's version; the
    /// conflict is still reported.
    Override,
    /// Abort the merge on the first conflicting member.
    Strict,
}

/// A member that exists in both classes with differing content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberConflict {
    /// Whether the member is a field or a method.
    pub kind: NodeKind,
    /// Member name.
    pub name: String,
}

/// Result of a successful merge.
#[derive(Debug)]
pub struct MergeOutcome {
    /// The new destination tree. Inputs are left untouched.
    pub tree: SourceTree,
    /// Names of fields cloned into the destination.
    pub added_fields: Vec<String>,
    /// Names of methods cloned into the destination.
    pub added_methods: Vec<String>,
    /// Derive traits added to the destination struct.
    pub added_derives: Vec<String>,
    /// Members present in both classes with differing content.
    pub conflicts: Vec<MemberConflict>,
}

/// Merges the class `class` from `source` into `destination`.
///
/// Fails when the target class is absent from the destination, when the
/// source has no class of that name, or when a conflict occurs under
/// [`MergePolicy::Strict`].
pub fn merge_class(
    destination: &SourceTree,
    source: &SourceTree,
    class: &str,
    policy: MergePolicy,
) -> EngineResult<MergeOutcome> {
    let src_struct = find_struct(&source.file, class).ok_or_else(|| {
        EngineError::Merge(format!(
            "class '{}' not found in source file {}",
            class,
            source.path.display()
        ))
    })?;
    let dest_struct = find_struct(&destination.file, class).ok_or_else(|| {
        EngineError::Merge(format!(
            "target class '{}' not found in destination file {}",
            class,
            destination.path.display()
        ))
    })?;

    let src_fields = named_fields(src_struct);
    let src_methods = collect_methods(&source.file, class);
    let src_derives = derive_names(&src_struct.attrs);
    let dest_fields = member_tokens(named_fields(dest_struct).iter().map(|f| {
        let name = f.ident.as_ref().map(|i| i.to_string()).unwrap_or_default();
        (name, f.to_token_stream().to_string())
    }));
    let dest_methods = member_tokens(
        collect_methods(&destination.file, class)
            .into_iter()
            .map(|(name, method)| (name, method.to_token_stream().to_string())),
    );
    let dest_derives = derive_names(&dest_struct.attrs);

    // Classify every source member up front so strict mode can abort before
    // any structural edit, and so the conflict report is deterministic:
    // fields first, then methods, each in source document order.
    let mut conflicts = Vec::new();
    for field in &src_fields {
        if let Some(ident) = &field.ident {
            let name = ident.to_string();
            match dest_fields.get(&name) {
                Some(existing) if *existing != field.to_token_stream().to_string() => {
                    conflicts.push(MemberConflict {
                        kind: NodeKind::Field,
                        name,
                    });
                }
                _ => {}
            }
        }
    }
    for (name, method) in &src_methods {
        match dest_methods.get(name) {
            Some(existing) if *existing != method.to_token_stream().to_string() => {
                conflicts.push(MemberConflict {
                    kind: NodeKind::Method,
                    name: name.clone(),
                });
            }
            _ => {}
        }
    }

    if policy == MergePolicy::Strict && !conflicts.is_empty() {
        let listing = conflicts
            .iter()
            .map(|c| format!("{} '{}'", c.kind, c.name))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(EngineError::Merge(format!(
            "conflicting members in class '{}': {}",
            class, listing
        )));
    }

    let mut file = destination.file.clone();
    let struct_idx = file
        .items
        .iter()
        .position(|item| matches!(item, Item::Struct(s) if s.ident == class))
        .ok_or_else(|| {
            EngineError::Configuration(format!(
                "class '{}' found during scan but not during edit",
                class
            ))
        })?;

    let mut added_fields = Vec::new();
    let mut added_derives = Vec::new();

    {
        let strukt = match &mut file.items[struct_idx] {
            Item::Struct(s) => s,
            _ => {
                return Err(EngineError::Configuration(format!(
                    "item at position of class '{}' is not a struct",
                    class
                )))
            }
        };

        for derive in &src_derives {
            if !dest_derives.contains(derive) {
                push_derive(strukt, derive)?;
                added_derives.push(derive.clone());
            }
        }

        if !src_fields.is_empty() {
            upgrade_to_named_fields(strukt, class)?;
            if let Fields::Named(named) = &mut strukt.fields {
                for field in &src_fields {
                    let Some(ident) = &field.ident else { continue };
                    let name = ident.to_string();
                    if dest_fields.contains_key(&name) {
                        if policy == MergePolicy::Override
                            && conflicts
                                .iter()
                                .any(|c| c.kind == NodeKind::Field && c.name == name)
                        {
                            if let Some(existing) = named
                                .named
                                .iter_mut()
                                .find(|f| f.ident.as_ref() == Some(ident))
                            {
                                *existing = field.clone();
                            }
                        }
                    } else {
                        named.named.push(field.clone());
                        added_fields.push(name);
                    }
                }
            }
        }
    }

    let mut added_methods = Vec::new();
    for (name, method) in &src_methods {
        if dest_methods.contains_key(name) {
            if policy == MergePolicy::Override
                && conflicts
                    .iter()
                    .any(|c| c.kind == NodeKind::Method && c.name == *name)
            {
                replace_method(&mut file, class, method);
            }
        } else {
            append_method(&mut file, struct_idx, class, method.clone());
            added_methods.push(name.clone());
        }
    }

    tracing::debug!(
        class,
        fields = added_fields.len(),
        methods = added_methods.len(),
        conflicts = conflicts.len(),
        "class merged"
    );

    Ok(MergeOutcome {
        tree: SourceTree {
            file,
            path: destination.path.clone(),
        },
        added_fields,
        added_methods,
        added_derives,
        conflicts,
    })
}

fn member_tokens(entries: impl Iterator<Item = (String, String)>) -> IndexMap<String, String> {
    entries.filter(|(name, _)| !name.is_empty()).collect()
}

/// Finds a struct by name among the file's top-level items.
fn find_struct<'a>(file: &'a syn::File, name: &str) -> Option<&'a ItemStruct> {
    file.items.iter().find_map(|item| match item {
        Item::Struct(s) if s.ident == name => Some(s),
        _ => None,
    })
}

fn named_fields(strukt: &ItemStruct) -> Vec<syn::Field> {
    match &strukt.fields {
        Fields::Named(named) => named.named.iter().cloned().collect(),
        _ => Vec::new(),
    }
}

/// Collects the methods of every inherent impl of `class`, in document
/// order. Trait impls are left alone: their members belong to the trait
/// contract, not the class body.
fn collect_methods(file: &syn::File, class: &str) -> IndexMap<String, ImplItemFn> {
    let mut methods = IndexMap::new();
    for item in &file.items {
        if let Item::Impl(imp) = item {
            if imp.trait_.is_none() && node::self_ty_name(imp).as_deref() == Some(class) {
                for impl_item in &imp.items {
                    if let ImplItem::Fn(method) = impl_item {
                        methods
                            .entry(method.sig.ident.to_string())
                            .or_insert_with(|| method.clone());
                    }
                }
            }
        }
    }
    methods
}

/// Normalized derive trait paths on a set of attributes.
fn derive_names(attrs: &[syn::Attribute]) -> Vec<String> {
    let mut names = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("derive") {
            continue;
        }
        if let Ok(paths) =
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
        {
            for path in paths {
                names.push(path.to_token_stream().to_string().replace(' ', ""));
            }
        }
    }
    names
}

/// Appends a trait to the struct's derive attribute, creating the attribute
/// when the struct has none.
fn push_derive(strukt: &mut ItemStruct, trait_path: &str) -> EngineResult<()> {
    let path: syn::Path = syn::parse_str(trait_path)
        .map_err(|_| EngineError::Merge(format!("invalid derive trait '{}'", trait_path)))?;

    if let Some(attr) = strukt
        .attrs
        .iter_mut()
        .find(|attr| attr.path().is_ident("derive"))
    {
        let mut paths = attr
            .parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
            .map_err(|err| EngineError::Merge(format!("malformed derive attribute: {}", err)))?;
        paths.push(path);
        *attr = parse_quote!(#[derive(#paths)]);
        return Ok(());
    }

    strukt.attrs.push(parse_quote!(#[derive(#path)]));
    Ok(())
}

/// Unit structs grow an empty named-field body so fields can be merged in.
/// Tuple structs have no named members to merge into.
fn upgrade_to_named_fields(strukt: &mut ItemStruct, class: &str) -> EngineResult<()> {
    match &strukt.fields {
        Fields::Named(_) => Ok(()),
        Fields::Unit => {
            let named: syn::FieldsNamed = parse_quote!({});
            strukt.fields = Fields::Named(named);
            strukt.semi_token = None;
            Ok(())
        }
        Fields::Unnamed(_) => Err(EngineError::Merge(format!(
            "class '{}' is a tuple struct; its fields cannot be merged by name",
            class
        ))),
    }
}

fn replace_method(file: &mut syn::File, class: &str, method: &ImplItemFn) {
    for item in &mut file.items {
        if let Item::Impl(imp) = item {
            if imp.trait_.is_none() && node::self_ty_name(imp).as_deref() == Some(class) {
                for impl_item in &mut imp.items {
                    if let ImplItem::Fn(existing) = impl_item {
                        if existing.sig.ident == method.sig.ident {
                            *existing = method.clone();
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Appends a method to the first inherent impl of the class, creating one
/// directly after the struct when none exists yet.
fn append_method(file: &mut syn::File, struct_idx: usize, class: &str, method: ImplItemFn) {
    for item in &mut file.items {
        if let Item::Impl(imp) = item {
            if imp.trait_.is_none() && node::self_ty_name(imp).as_deref() == Some(class) {
                imp.items.push(ImplItem::Fn(method));
                return;
            }
        }
    }

    let ident = syn::Ident::new(class, proc_macro2::Span::call_site());
    let mut imp: ItemImpl = parse_quote! { impl #ident {} };
    imp.items.push(ImplItem::Fn(method));
    file.items.insert(struct_idx + 1, Item::Impl(imp));
}
