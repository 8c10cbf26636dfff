//! Tests for the GitHub MCP adapter

use mcpconf_core::{
    DeploymentType, Format, FormatAdapter, GithubMcpAdapter, TransportType,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::fixtures::{local_server, remote_server};

#[test]
fn test_stdio_export_is_conversion_error() {
    let err = GithubMcpAdapter.export(&local_server("weather")).unwrap_err();
    assert_eq!(err.format, Format::GithubMcp);
    assert_eq!(err.path, "config.transport");
}

#[test]
fn test_export_remote() {
    let entry = remote_server("api", TransportType::Websocket, "wss://api.dev/ws");
    let doc = GithubMcpAdapter.export(&entry).unwrap();
    assert_eq!(
        doc,
        json!({ "servers": { "api": { "type": "websocket", "url": "wss://api.dev/ws" } } })
    );
}

#[test]
fn test_inputs_are_hints_not_values() {
    let doc = json!({
        "inputs": [
            { "type": "promptString", "id": "api_key", "description": "API key", "password": true }
        ],
        "servers": {
            "api": {
                "type": "https",
                "url": "https://api.dev/mcp",
                "headers": { "X-Api-Key": "${input:api_key}" }
            },
            "public": { "type": "https", "url": "https://public.dev/mcp" }
        }
    });
    let entries = GithubMcpAdapter.import(&doc).unwrap();

    let api = &entries[0];
    assert_eq!(api.deployment, DeploymentType::Remote);
    assert_eq!(api.config.headers().unwrap()["X-Api-Key"], "${input:api_key}");
    assert_eq!(api.inputs.len(), 1);
    assert_eq!(api.inputs[0].description.as_deref(), Some("API key"));

    assert!(entries[1].inputs.is_empty());
}

#[test]
fn test_malformed_inputs_fail_the_document() {
    let doc = json!({ "inputs": [{ "type": "promptString" }], "servers": {} });
    let err = GithubMcpAdapter.import_batch(&doc).unwrap_err();
    assert_eq!(err.path, "inputs[0].id");
}
