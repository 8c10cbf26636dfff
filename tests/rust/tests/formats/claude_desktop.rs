//! Tests for the Claude Desktop adapter

use mcpconf_core::{
    ClaudeDesktopAdapter, DeploymentType, Format, FormatAdapter, TransportType,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_weather_example() {
    let doc = json!({"mcpServers": {"weather": {"command": "uv", "args": ["run", "weather.py"]}}});
    let entries = ClaudeDesktopAdapter.import(&doc).unwrap();

    assert_eq!(entries.len(), 1);
    let weather = &entries[0];
    assert_eq!(weather.id(), "weather");
    assert_eq!(weather.deployment, DeploymentType::Local);
    assert_eq!(weather.config.transport(), TransportType::Stdio);
    assert_eq!(weather.config.command(), Some("uv"));
}

#[test]
fn test_import_keeps_document_order() {
    let doc = json!({
        "mcpServers": {
            "zeta": { "command": "z" },
            "alpha": { "url": "http://localhost:8080/mcp" },
            "mid": { "command": "m", "env": { "TOKEN": "${input:tok}" } }
        }
    });
    let entries = ClaudeDesktopAdapter.import(&doc).unwrap();
    let ids: Vec<&str> = entries.iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    assert_eq!(entries[1].config.transport(), TransportType::Http);
    assert_eq!(entries[2].config.env().unwrap()["TOKEN"], "${input:tok}");
}

#[test]
fn test_import_defaults_lossy_fields() {
    let doc = json!({ "mcpServers": { "my-tool": { "command": "npx" } } });
    let entry = &ClaudeDesktopAdapter.import(&doc).unwrap()[0];

    assert_eq!(entry.name, "My Tool");
    assert_eq!(
        entry.description.as_deref(),
        Some("Imported from Claude Desktop configuration")
    );
    assert!(entry.version.is_none());
    assert!(entry.capabilities.is_none());
    assert!(entry.security.is_none());
}

#[test]
fn test_shape_errors_name_the_path() {
    let err = ClaudeDesktopAdapter
        .import(&json!({ "mcpServers": [] }))
        .unwrap_err();
    assert_eq!(err.format, Format::ClaudeDesktop);
    assert_eq!(err.path, "mcpServers");

    let err = ClaudeDesktopAdapter
        .import(&json!({ "mcpServers": { "x": { "command": "node", "args": "index.js" } } }))
        .unwrap_err();
    assert_eq!(err.path, "mcpServers.x.args");

    let err = ClaudeDesktopAdapter
        .import(&json!({ "mcpServers": { "x": { "command": "node", "url": "http://x" } } }))
        .unwrap_err();
    assert_eq!(err.path, "mcpServers.x");
}
