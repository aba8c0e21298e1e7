//! End-to-end runs of the manifest -> factory -> processor pipeline against
//! real files in temp directories.

use pretty_assertions::assert_eq;
use restruct_core::{
    from_yaml_str, Filesystem, ManifestFile, ProcessorFactory, ProcessorOutcome,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn run(manifest: &ManifestFile) -> ProcessorOutcome {
    ProcessorFactory::new(Filesystem)
        .execute(manifest)
        .unwrap()
}

fn manifest(yaml: &str) -> ManifestFile {
    from_yaml_str(yaml).unwrap()
}

#[test]
fn test_find_via_manifest() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("widget.rs");
    fs::write(
        &file,
        "struct Widget;\n\nimpl Widget {\n    fn bar(&self) -> i32 {\n        1\n    }\n}\n",
    )
    .unwrap();

    let manifest = manifest(&format!(
        r#"
find:
  file: {}
  spec:
    kind: method
    name: bar
    within: Widget
"#,
        file.display()
    ));

    match run(&manifest) {
        ProcessorOutcome::Matches { path, matches } => {
            assert_eq!(path, file);
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].name, "bar");
            assert_eq!(matches[0].class.as_deref(), Some("Widget"));
            assert_eq!(matches[0].span.start_line, 4);
        }
        other => panic!("expected matches, got {:?}", other),
    }
}

/// The canonical scenario: replace `Widget::bar` with an empty-bodied
/// method. The signature's wrapper and the struct survive.
#[test]
fn test_replace_method_body_via_manifest() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("widget.rs");
    fs::write(
        &file,
        "struct Widget;\nimpl Widget {\n    fn bar(&self) -> i32 {\n        1\n    }\n}\n",
    )
    .unwrap();

    let manifest = manifest(&format!(
        r#"
find_and_replace:
  file: {}
  spec:
    kind: method
    name: bar
    within: Widget
  replacement: "fn bar(&self) {{}}"
"#,
        file.display()
    ));

    match run(&manifest) {
        ProcessorOutcome::Written { changed, .. } => assert!(changed),
        other => panic!("expected written outcome, got {:?}", other),
    }

    let rewritten = fs::read_to_string(&file).unwrap();
    assert!(rewritten.contains("struct Widget;"));
    assert!(rewritten.contains("fn bar(&self) {}"));
    assert!(!rewritten.contains("-> i32"));
}

#[test]
fn test_replace_with_no_matches_leaves_file_byte_identical() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("widget.rs");
    // Deliberately odd formatting: a rewrite would normalize it away.
    let original = "struct   Widget ;\n";
    fs::write(&file, original).unwrap();

    let manifest = manifest(&format!(
        r#"
find_and_replace:
  file: {}
  spec:
    kind: method
    name: missing
  replacement: "fn missing(&self) {{}}"
"#,
        file.display()
    ));

    match run(&manifest) {
        ProcessorOutcome::Written { changed, .. } => assert!(!changed),
        other => panic!("expected written outcome, got {:?}", other),
    }
    assert_eq!(fs::read_to_string(&file).unwrap(), original);
}

#[test]
fn test_merge_class_via_manifest() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("account.rs");
    let src = dir.path().join("account_patch.rs");
    fs::write(
        &dest,
        "pub struct Account {\n    pub id: i32,\n}\n\nimpl Account {\n    pub fn id(&self) -> i32 {\n        self.id\n    }\n}\n",
    )
    .unwrap();
    fs::write(
        &src,
        "pub struct Account {\n    pub balance: i64,\n}\n\nimpl Account {\n    pub fn balance(&self) -> i64 {\n        self.balance\n    }\n}\n",
    )
    .unwrap();

    let manifest = manifest(&format!(
        r#"
merge_class:
  destination: {}
  source: {}
  class: Account
"#,
        dest.display(),
        src.display()
    ));

    match run(&manifest) {
        ProcessorOutcome::Merged {
            added_fields,
            added_methods,
            conflicts,
            ..
        } => {
            assert_eq!(added_fields, vec!["balance"]);
            assert_eq!(added_methods, vec!["balance"]);
            assert!(conflicts.is_empty());
        }
        other => panic!("expected merged outcome, got {:?}", other),
    }

    let merged = fs::read_to_string(&dest).unwrap();
    assert!(merged.contains("pub id: i32"));
    assert!(merged.contains("pub balance: i64"));
    assert!(merged.contains("pub fn id(&self)"));
    assert!(merged.contains("pub fn balance(&self)"));

    // Re-running the same manifest is structurally a no-op.
    run(&manifest);
    assert_eq!(fs::read_to_string(&dest).unwrap(), merged);
}

#[test]
fn test_missing_input_file_is_an_io_error() {
    let manifest = manifest(
        r#"
find:
  file: /nonexistent/widget.rs
  spec:
    kind: struct
"#,
    );
    let err = ProcessorFactory::new(Filesystem)
        .execute(&manifest)
        .unwrap_err();
    assert!(format!("{}", err).contains("/nonexistent/widget.rs"));
}

#[test]
fn test_matches_serialize_for_reporting() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("lib.rs");
    fs::write(&file, "pub struct Config { pub retries: u32 }\n").unwrap();

    let manifest = manifest(&format!(
        r#"
find:
  file: {}
  spec:
    kind: field
    within: Config
"#,
        file.display()
    ));

    let outcome = run(&manifest);
    let json = serde_json::to_value(&outcome).unwrap();
    let matches = &json["Matches"]["matches"];
    assert_eq!(matches[0]["name"], "retries");
    assert_eq!(matches[0]["kind"], "field");
    assert_eq!(matches[0]["class"], "Config");
}

#[test]
fn test_round_trip_survives_representative_file() {
    let code = r#"
//! Module docs.

use std::fmt;

#[derive(Debug, Clone)]
pub struct Order {
    pub id: u64,
    lines: Vec<String>,
}

impl Order {
    pub fn total(&self) -> usize {
        self.lines.len()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order {}", self.id)
    }
}

pub enum Status {
    Open,
    Closed { reason: String },
}
"#;
    let tree = restruct_core::parse_source(code, Path::new("order.rs")).unwrap();
    let printed = restruct_core::print_tree(&tree);
    let reparsed = restruct_core::parse_source(&printed, Path::new("order.rs")).unwrap();
    assert_eq!(restruct_core::print_tree(&reparsed), printed);
}
