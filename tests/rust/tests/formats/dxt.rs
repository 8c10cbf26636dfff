//! Tests for the DXT manifest adapter

use mcpconf_core::format::DXT_VERSION;
use mcpconf_core::{DeploymentType, DxtAdapter, FormatAdapter, TransportType};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::fixtures::{full_server, remote_server};

#[test]
fn test_import_minimal_manifest() {
    let doc = json!({
        "dxt_version": "0.1",
        "name": "files",
        "version": "0.3.0",
        "server": {
            "type": "node",
            "entry_point": "server/index.js",
            "mcp_config": {
                "command": "node",
                "args": ["${__dirname}/server/index.js", "${user_config.root}"]
            }
        },
        "user_config": {
            "root": { "type": "directory", "title": "Root", "required": true }
        }
    });
    let entries = DxtAdapter.import(&doc).unwrap();
    assert_eq!(entries.len(), 1);

    let files = &entries[0];
    assert_eq!(files.id(), "files");
    assert_eq!(files.name, "files");
    assert_eq!(files.deployment, DeploymentType::Local);
    assert_eq!(files.config.transport(), TransportType::Stdio);
    assert_eq!(files.config.args()[1], "${user_config.root}");
    assert_eq!(files.inputs[0].id, "root");
    assert!(files.inputs[0].required);
}

#[test]
fn test_export_synthesizes_minimal_manifest() {
    let manifest = DxtAdapter.export(&full_server("weather")).unwrap();

    assert_eq!(manifest["dxt_version"], DXT_VERSION);
    assert_eq!(manifest["name"], "weather");
    assert_eq!(manifest["display_name"], "Weather");
    assert_eq!(manifest["server"]["type"], "python");
    assert_eq!(
        manifest["server"]["mcp_config"],
        json!({
            "command": "uv",
            "args": ["run", "weather.py"],
            "env": { "API_KEY": "${input:weather_key}" }
        })
    );
    assert_eq!(manifest["compatibility"]["platforms"], json!(["darwin", "linux"]));
    assert_eq!(manifest["compatibility"]["runtimes"], json!({ "python": ">=3.10" }));
    assert_eq!(manifest["compatibility"]["claude_desktop"], ">=0.10.0");
    assert_eq!(manifest["user_config"]["weather_key"]["sensitive"], true);
}

#[test]
fn test_export_remote_is_error() {
    let entry = remote_server("api", TransportType::Https, "https://api.dev/mcp");
    let err = DxtAdapter.export(&entry).unwrap_err();
    assert_eq!(err.path, "config.transport");
}

#[test]
fn test_missing_server_section_is_error() {
    let err = DxtAdapter.import(&json!({ "name": "x" })).unwrap_err();
    assert_eq!(err.path, "server");
}
