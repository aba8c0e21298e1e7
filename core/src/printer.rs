//! # Pretty Printer
//!
//! Converts trees and single constructs back into source text via
//! `prettyplease`. The printed text re-parses to a tree token-equal to the
//! input, which is the round-trip invariant the write-back path depends on.
//! Whitespace fidelity is the printer's fixed normal form, not the input's.

use crate::node::SourceTree;

/// Prints a whole tree back to source text.
pub fn print_tree(tree: &SourceTree) -> String {
    prettyplease::unparse(&tree.file)
}

/// Prints a list of items as one source text.
pub fn print_items(items: &[syn::Item]) -> String {
    let file = syn::File {
        shebang: None,
        attrs: Vec::new(),
        items: items.to_vec(),
    };
    prettyplease::unparse(&file)
}

/// Prints a single item, trimmed of the trailing file newline.
pub fn print_item(item: &syn::Item) -> String {
    print_items(std::slice::from_ref(item))
        .trim_end()
        .to_string()
}

/// Prints an associated function as a standalone snippet.
pub fn print_method(method: &syn::ImplItemFn) -> String {
    let item = syn::Item::Fn(syn::ItemFn {
        attrs: method.attrs.clone(),
        vis: method.vis.clone(),
        sig: method.sig.clone(),
        block: Box::new(method.block.clone()),
    });
    print_item(&item)
}

/// Prints a named field as a one-line snippet.
pub fn print_field(field: &syn::Field) -> String {
    let mut carrier: syn::ItemStruct = syn::parse_quote! { struct Carrier {} };
    if let syn::Fields::Named(named) = &mut carrier.fields {
        named.named.push(field.clone());
    }
    let rendered = print_item(&syn::Item::Struct(carrier));
    rendered
        .lines()
        .filter(|line| !line.starts_with("struct") && line.trim() != "}")
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(',')
        .to_string()
}
