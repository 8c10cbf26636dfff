//! Tests for loading and saving the canonical registry file

use std::fs;

use mcpconf_core::{DocumentFormat, RegistryStore, StoreError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tests::fixtures::{full_server, local_server};

fn populated() -> RegistryStore {
    let mut store = RegistryStore::new();
    store.add("zeta", local_server("zeta")).unwrap();
    store.add("weather", full_server("weather")).unwrap();
    store.add("alpha", local_server("alpha")).unwrap();
    store.add_to_category("utilities", "alpha").unwrap();
    store
}

#[test]
fn test_yaml_round_trip_preserves_everything() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mcp-registry.yaml");

    let mut store = populated();
    store.save_to(&path).unwrap();
    assert_eq!(store.path(), Some(path.as_path()));

    let loaded = RegistryStore::load(&path).unwrap();
    assert_eq!(loaded.registry(), store.registry());
    assert_eq!(loaded.registry().server_ids(), vec!["zeta", "weather", "alpha"]);
}

#[test]
fn test_json_is_used_for_other_extensions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("registry.json");

    let mut store = populated();
    store.save_to(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["version"], "1.0");
    assert_eq!(value["servers"]["weather"]["config"]["transport"], "stdio");
    assert!(value["servers"]["weather"].get("id").is_none());

    let loaded = RegistryStore::load(&path).unwrap();
    assert_eq!(loaded.registry(), store.registry());
}

#[test]
fn test_load_missing_file_fails_but_open_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.yaml");

    assert!(matches!(RegistryStore::load(&path), Err(StoreError::Io { .. })));

    let store = RegistryStore::open(&path).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.path(), Some(path.as_path()));
}

#[test]
fn test_empty_file_is_empty_registry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.yaml");
    fs::write(&path, "").unwrap();

    let store = RegistryStore::load(&path).unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_invalid_document_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{ "version": "1.0", "servers": { "x": { "name": "X" } } }"#).unwrap();

    assert!(matches!(RegistryStore::load(&path), Err(StoreError::Json(_))));
}

#[test]
fn test_document_format_render_parse() {
    let store = populated();
    for format in [DocumentFormat::Json, DocumentFormat::Yaml] {
        let text = format.render(store.registry()).unwrap();
        assert_eq!(&format.parse(&text).unwrap(), store.registry());
    }
}
