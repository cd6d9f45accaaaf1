use std::path::PathBuf;

use clap::Parser;
use criteria_cli::{compile_document, run, Cli};
use criteria::QuerySyntax;

const TREE: &str = r#"{
  "id": "root", "nodeType": "CONDITION", "junction": "AND",
  "children": [
    {"id": "r1", "nodeType": "RULE", "field": "status", "type": "string",
     "operation": "equals", "values": ["ACTIVE"]},
    {"id": "r2", "nodeType": "RULE", "field": "owner", "type": "uri",
     "operation": "not_set_to_query",
     "values": [{"id": "n1", "nodeType": "RULE", "field": "name", "type": "string",
                 "operation": "equals", "values": ["bob"]}]}
  ]
}"#;

fn run_args(args: &[&str], stdin: &str) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    let mut out = Vec::new();
    run(&cli, &mut stdin.as_bytes(), &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn compiles_from_stdin() {
    let out = run_args(&["criteria", "compile", "-"], TREE).unwrap();
    assert_eq!(out, "(status:\"ACTIVE\" AND -(owner:{name:\"bob\"}))\n");
}

#[test]
fn compiles_file_with_namespaces_and_syntax() {
    let dir = tempfile::tempdir().unwrap();
    let tree = dir.path().join("tree.json");
    let namespaces = dir.path().join("namespaces.yaml");
    let syntax = dir.path().join("syntax.yaml");
    std::fs::write(&tree, TREE).unwrap();
    std::fs::write(
        &namespaces,
        "default_prefix: cm\nprefixes: [cm, app]\nfields:\n  owner: app:owner\n",
    )
    .unwrap();
    std::fs::write(&syntax, "and_token: \"&&\"\n").unwrap();

    let out = run_args(
        &[
            "criteria",
            "compile",
            tree.to_str().unwrap(),
            "--namespaces",
            namespaces.to_str().unwrap(),
            "--syntax",
            syntax.to_str().unwrap(),
        ],
        "",
    )
    .unwrap();
    assert_eq!(
        out,
        "(cm:status:\"ACTIVE\" && -(app:owner:{cm:name:\"bob\"}))\n"
    );
}

#[test]
fn lists_operations() {
    let out = run_args(&["criteria", "operations"], "").unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines.len() > 20);
    assert!(lines.iter().all(|line| line.trim_start().starts_with("100")));
    assert!(lines.iter().any(|line| line.contains("uri/set_to_query")));
    assert!(lines.iter().any(|line| line.contains("boolean/is_not")));
}

#[test]
fn compile_errors_carry_context() {
    let tree = r#"{"id": "r", "nodeType": "RULE", "field": "f", "type": "string",
                   "operation": "sounds_like", "values": ["x"]}"#;
    let err = run_args(&["criteria", "compile", "-"], tree).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("failed to compile tree 'r'"), "{message}");
    assert!(message.contains("sounds_like"), "{message}");
}

#[test]
fn invalid_document_is_reported() {
    let err = run_args(&["criteria", "compile", "-"], "{\"nodeType\": \"GROUP\", \"id\": \"g\"}")
        .unwrap_err();
    assert!(format!("{err:#}").contains("unsupported node type 'GROUP'"));
}

#[test]
fn missing_file_is_reported() {
    let missing = PathBuf::from("/nonexistent/tree.json");
    let err = run_args(&["criteria", "compile", missing.to_str().unwrap()], "").unwrap_err();
    assert!(format!("{err:#}").contains("failed to read /nonexistent/tree.json"));
}

#[test]
fn bad_namespaces_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let namespaces = dir.path().join("ns.yaml");
    std::fs::write(&namespaces, "default_prefix: cm\nprefixes: [sys]\n").unwrap();

    let err = run_args(
        &["criteria", "operations", "--namespaces", namespaces.to_str().unwrap()],
        "",
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("failed to load namespaces"));
}

#[test]
fn compile_document_uses_given_syntax() {
    let registry =
        criteria_fts::registry(std::sync::Arc::new(criteria_fts::PrefixResolver::new())).unwrap();
    let syntax = QuerySyntax {
        group_open: "[".into(),
        group_close: "]".into(),
        ..QuerySyntax::default()
    };
    let out = compile_document(
        r#"{"id": "c", "nodeType": "CONDITION", "junction": "OR", "children": []}"#,
        registry,
        syntax,
    )
    .unwrap();
    assert_eq!(out, "[]");
}
