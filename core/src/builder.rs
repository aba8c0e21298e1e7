#![deny(missing_docs)]

//! # Class Builder
//!
//! Synthesizes a brand-new class (struct + inherent impl) from a declarative
//! [`ClassDescription`], without consulting any existing source. The
//! description is rendered to source text and parsed back, so every output
//! is guaranteed to be well-formed. Invalid descriptions (duplicate members,
//! reserved words, malformed types) fail with [`EngineError::Builder`].

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Declarative blueprint for a class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDescription {
    /// Class (struct) name.
    pub name: String,
    /// Doc comment placed on the struct.
    #[serde(default)]
    pub doc: Option<String>,
    /// Traits listed in the struct's `#[derive(..)]` attribute.
    #[serde(default)]
    pub derives: Vec<String>,
    /// Ordered property descriptors.
    #[serde(default)]
    pub fields: Vec<FieldDescription>,
    /// Ordered method descriptors.
    #[serde(default)]
    pub methods: Vec<MethodDescription>,
}

/// One property of a class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescription {
    /// Field name.
    pub name: String,
    /// Field type, as Rust source.
    pub ty: String,
    /// Whether the field is `pub`.
    #[serde(default = "default_public")]
    pub public: bool,
}

/// One method of a class. Methods take `&self` and default to an empty body
/// (or `todo!()` when a return type is declared and no body is given).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDescription {
    /// Method name.
    pub name: String,
    /// Parameters after the receiver.
    #[serde(default)]
    pub params: Vec<ParamDescription>,
    /// Return type, as Rust source.
    #[serde(default)]
    pub ret: Option<String>,
    /// Body template, as Rust statements.
    #[serde(default)]
    pub body: Option<String>,
    /// Whether the method is `pub`.
    #[serde(default = "default_public")]
    pub public: bool,
}

/// One method parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDescription {
    /// Parameter name.
    pub name: String,
    /// Parameter type, as Rust source.
    pub ty: String,
}

fn default_public() -> bool {
    true
}

/// A synthesized class: the struct item plus its inherent impl, if the
/// description declared any methods.
#[derive(Debug, Clone)]
pub struct BuiltClass {
    /// The struct item.
    pub strukt: syn::ItemStruct,
    /// The inherent impl carrying the methods.
    pub imp: Option<syn::ItemImpl>,
}

impl BuiltClass {
    /// The class as a list of items, ready for printing.
    pub fn into_items(self) -> Vec<syn::Item> {
        let mut items = vec![syn::Item::Struct(self.strukt)];
        if let Some(imp) = self.imp {
            items.push(syn::Item::Impl(imp));
        }
        items
    }
}

/// Synthesizes a well-formed class node from the description.
pub fn build_class(description: &ClassDescription) -> EngineResult<BuiltClass> {
    validate(description)?;

    let source = render(description);
    let file = syn::parse_file(&source).map_err(|err| {
        EngineError::Builder(format!(
            "class '{}' does not assemble into valid Rust: {}",
            description.name, err
        ))
    })?;

    let mut strukt = None;
    let mut imp = None;
    for item in file.items {
        match item {
            syn::Item::Struct(s) => strukt = Some(s),
            syn::Item::Impl(i) => imp = Some(i),
            _ => {}
        }
    }

    let strukt = strukt.ok_or_else(|| {
        EngineError::Builder(format!(
            "class '{}' did not produce a struct item",
            description.name
        ))
    })?;

    Ok(BuiltClass { strukt, imp })
}

/// Rejects descriptions that cannot produce a well-formed class: duplicate
/// member names, and names that are reserved words or otherwise not valid
/// identifiers.
fn validate(description: &ClassDescription) -> EngineResult<()> {
    check_ident(&description.name, "class name")?;

    let mut field_names = HashSet::new();
    for field in &description.fields {
        check_ident(&field.name, "field name")?;
        if !field_names.insert(field.name.as_str()) {
            return Err(EngineError::Builder(format!(
                "duplicate field '{}' in class '{}'",
                field.name, description.name
            )));
        }
    }

    let mut method_names = HashSet::new();
    for method in &description.methods {
        check_ident(&method.name, "method name")?;
        if !method_names.insert(method.name.as_str()) {
            return Err(EngineError::Builder(format!(
                "duplicate method '{}' in class '{}'",
                method.name, description.name
            )));
        }
        for param in &method.params {
            check_ident(&param.name, "parameter name")?;
        }
    }

    Ok(())
}

/// An identifier is valid when `syn` accepts it; keywords are rejected by
/// the grammar itself.
fn check_ident(candidate: &str, what: &str) -> EngineResult<()> {
    syn::parse_str::<syn::Ident>(candidate).map_err(|_| {
        EngineError::Builder(format!(
            "'{}' is not a valid {} (reserved word or invalid identifier)",
            candidate, what
        ))
    })?;
    Ok(())
}

/// Assembles the description into source text: docs, derive attribute,
/// struct body, inherent impl.
fn render(description: &ClassDescription) -> String {
    let mut code = String::new();

    if let Some(doc) = &description.doc {
        for line in doc.lines() {
            code.push_str(&format!("/// {}\n", line));
        }
    }

    if !description.derives.is_empty() {
        code.push_str(&format!("#[derive({})]\n", description.derives.join(", ")));
    }

    if description.fields.is_empty() {
        code.push_str(&format!("pub struct {};\n", description.name));
    } else {
        code.push_str(&format!("pub struct {} {{\n", description.name));
        for field in &description.fields {
            let vis = if field.public { "pub " } else { "" };
            code.push_str(&format!("    {}{}: {},\n", vis, field.name, field.ty));
        }
        code.push_str("}\n");
    }

    if !description.methods.is_empty() {
        code.push_str(&format!("\nimpl {} {{\n", description.name));
        for method in &description.methods {
            let vis = if method.public { "pub " } else { "" };
            let mut params = String::from("&self");
            for param in &method.params {
                params.push_str(&format!(", {}: {}", param.name, param.ty));
            }
            let ret = method
                .ret
                .as_ref()
                .map(|ty| format!(" -> {}", ty))
                .unwrap_or_default();
            let body = match (&method.body, &method.ret) {
                (Some(body), _) => body.clone(),
                (None, Some(_)) => "todo!()".to_string(),
                (None, None) => String::new(),
            };
            code.push_str(&format!(
                "    {}fn {}({}){} {{\n",
                vis, method.name, params, ret
            ));
            for line in body.lines() {
                code.push_str(&format!("        {}\n", line));
            }
            code.push_str("    }\n");
        }
        code.push_str("}\n");
    }

    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::print_items;

    fn description() -> ClassDescription {
        ClassDescription {
            name: "Account".into(),
            doc: Some("A customer account.".into()),
            derives: vec!["Debug".into(), "Clone".into()],
            fields: vec![FieldDescription {
                name: "balance".into(),
                ty: "i64".into(),
                public: true,
            }],
            methods: vec![MethodDescription {
                name: "balance".into(),
                params: vec![],
                ret: Some("i64".into()),
                body: Some("self.balance".into()),
                public: true,
            }],
        }
    }

    #[test]
    fn test_build_simple_class() {
        let built = build_class(&description()).unwrap();
        assert_eq!(built.strukt.ident.to_string(), "Account");
        let imp = built.imp.as_ref().unwrap();
        assert_eq!(imp.items.len(), 1);

        let rendered = print_items(&built.into_items());
        assert!(rendered.contains("#[derive(Debug, Clone)]"));
        assert!(rendered.contains("pub struct Account"));
        assert!(rendered.contains("pub fn balance(&self) -> i64"));
    }

    #[test]
    fn test_build_unit_class_without_fields() {
        let mut desc = description();
        desc.fields.clear();
        desc.methods.clear();
        let built = build_class(&desc).unwrap();
        assert!(matches!(built.strukt.fields, syn::Fields::Unit));
        assert!(built.imp.is_none());
    }

    #[test]
    fn test_duplicate_method_rejected() {
        let mut desc = description();
        desc.methods.push(desc.methods[0].clone());
        let err = build_class(&desc).unwrap_err();
        assert!(matches!(err, EngineError::Builder(_)));
        assert!(format!("{}", err).contains("duplicate method"));
    }

    #[test]
    fn test_reserved_word_field_rejected() {
        let mut desc = description();
        desc.fields.push(FieldDescription {
            name: "fn".into(),
            ty: "i32".into(),
            public: false,
        });
        let err = build_class(&desc).unwrap_err();
        assert!(format!("{}", err).contains("reserved word"));
    }

    #[test]
    fn test_missing_body_with_return_type_defaults_to_todo() {
        let mut desc = description();
        desc.methods[0].body = None;
        let built = build_class(&desc).unwrap();
        let rendered = print_items(&built.into_items());
        assert!(rendered.contains("todo!()"));
    }

    #[test]
    fn test_invalid_type_rejected() {
        let mut desc = description();
        desc.fields[0].ty = "not a type!!".into();
        assert!(build_class(&desc).is_err());
    }
}
