#![allow(non_snake_case)]

use super::*;
use serde_json::json;
use tempfile::TempDir;

fn write_operations(dir: &Path, operations: serde_json::Value) {
    std::fs::write(
        dir.join("operations.json"),
        serde_json::to_vec(&json!({ "operations": operations })).unwrap(),
    )
    .unwrap();
}

fn users_update() -> serde_json::Value {
    json!([{
        "name": "users/update",
        "kind": "mutation",
        "executionEngine": "nodejs",
        "variablesSchema": {
            "type": "object",
            "properties": {
                "id": { "type": "string" },
                "name": { "type": "string" },
                "bio": { "type": "string" }
            },
            "required": ["id", "name"]
        },
        "responseSchema": {
            "type": "object",
            "properties": { "id": { "type": "string" } },
            "required": ["id"]
        }
    }])
}

fn manifest(targets: &str) -> Manifest {
    Manifest::from_str(&format!("[project]\nname = \"acme\"\n\n[targets]\n{targets}\n")).unwrap()
}

#[test]
fn generate___go_and_typescript___writes_all_files() {
    let dir = TempDir::new().unwrap();
    write_operations(dir.path(), users_update());
    let out = dir.path().join("out");

    let written = generate(&manifest("go = true\ntypescript = true"), dir.path(), &out, false).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["client.go", "client.ts", "models.go", "models.ts"]);

    let models = std::fs::read_to_string(out.join("models.go")).unwrap();
    assert!(models.starts_with("// Code generated by opsgen. DO NOT EDIT.\npackage client\n"));
    assert!(models.contains("\tBio *string `json:\"bio,omitempty\"`\n"));
    assert!(models.contains("\tId string `json:\"id,omitempty\"`\n"));
}

#[test]
fn generate___invalid_manifest___nothing_written() {
    let dir = TempDir::new().unwrap();
    write_operations(dir.path(), users_update());
    let out = dir.path().join("out");

    let result = generate(&manifest(""), dir.path(), &out, false);

    assert!(result.is_err());
    assert!(!out.exists());
}

#[test]
fn generate___unknown_engine___error_names_template() {
    let dir = TempDir::new().unwrap();
    write_operations(
        dir.path(),
        json!([{ "name": "legacy", "kind": "query", "executionEngine": "soap" }]),
    );

    let err = generate(&manifest("go = true"), dir.path(), &dir.path().join("out"), false).unwrap_err();

    let chain = format!("{err:#}");
    assert!(chain.contains("Generation failed for acme"));
    assert!(chain.contains("soap"));
}
