//! Tests for import_from and its conflict policies

use mcpconf_core::{
    ClaudeDesktopAdapter, DxtAdapter, GithubMcpAdapter, HostsAdapter, OnConflict, RegistryStore,
    StoreError,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::fixtures::{local_server, registry_json};

fn seeded_store() -> RegistryStore {
    RegistryStore::from_registry(serde_json::from_value(registry_json()).unwrap())
}

fn claude_doc() -> serde_json::Value {
    json!({
        "mcpServers": {
            "new-one": { "command": "node", "args": ["index.js"] },
            "weather": { "command": "python", "args": ["weather.py"] }
        }
    })
}

#[test]
fn test_error_policy_leaves_registry_unchanged() {
    let mut store = seeded_store();
    let before = store.registry().clone();

    let err = store
        .import_from(&ClaudeDesktopAdapter, &claude_doc(), OnConflict::Error)
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId(ref id) if id == "weather"));
    assert_eq!(store.registry(), &before);
}

#[test]
fn test_skip_policy_keeps_original() {
    let mut store = seeded_store();
    let original = store.get("weather").unwrap().clone();

    let report = store
        .import_from(&ClaudeDesktopAdapter, &claude_doc(), OnConflict::Skip)
        .unwrap();
    assert_eq!(report.added, vec!["new-one"]);
    assert_eq!(report.skipped, vec!["weather"]);
    assert_eq!(store.get("weather").unwrap(), &original);
}

#[test]
fn test_overwrite_policy_replaces_only_the_conflict() {
    let mut store = seeded_store();
    let sentry = store.get("sentry").unwrap().clone();

    let report = store
        .import_from(&ClaudeDesktopAdapter, &claude_doc(), OnConflict::Overwrite)
        .unwrap();
    assert_eq!(report.overwritten, vec!["weather"]);
    assert_eq!(store.get("weather").unwrap().config.command(), Some("python"));
    assert_eq!(store.get("sentry").unwrap(), &sentry);
    assert_eq!(store.registry().server_ids(), vec!["weather", "sentry", "new-one"]);
    assert_eq!(store.categories()["utilities"], vec!["weather"]);
}

#[test]
fn test_repeated_id_within_document_is_a_conflict() {
    let text = "a local stdio node\na local stdio deno\n".to_string();

    let mut store = RegistryStore::new();
    let err = store
        .import_from(&HostsAdapter, &text, OnConflict::Error)
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId(_)));
    assert!(store.is_empty());

    let report = store.import_from(&HostsAdapter, &text, OnConflict::Skip).unwrap();
    assert_eq!(report.added, vec!["a"]);
    assert_eq!(report.skipped, vec!["a"]);
    assert_eq!(store.get("a").unwrap().config.command(), Some("node"));
}

#[test]
fn test_conversion_failures_do_not_abort_batch() {
    let doc = json!({
        "servers": {
            "local": { "type": "stdio", "command": "node" },
            "remote": { "type": "https", "url": "https://remote.dev/mcp" }
        }
    });
    let mut store = RegistryStore::new();
    let report = store
        .import_from(&GithubMcpAdapter, &doc, OnConflict::Error)
        .unwrap();
    assert_eq!(report.added, vec!["remote"]);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].path, "servers.local.type");
}

#[test]
fn test_document_shape_error_is_surfaced() {
    let mut store = RegistryStore::new();
    store.add("files", local_server("files")).unwrap();

    let err = store
        .import_from(&DxtAdapter, &json!("not a manifest"), OnConflict::Skip)
        .unwrap_err();
    assert!(matches!(err, StoreError::Conversion(ref e) if e.path == "$"));
    assert_eq!(store.len(), 1);
}
