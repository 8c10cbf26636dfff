//! Tests for the hosts-line adapter

use mcpconf_core::{DeploymentType, FormatAdapter, HostsAdapter, Security, TransportType};
use pretty_assertions::assert_eq;
use tests::fixtures::{full_server, remote_server};

#[test]
fn test_export_projects_minimal_fields() {
    let line = HostsAdapter.export(&full_server("weather")).unwrap();
    assert_eq!(
        line,
        "weather local stdio uv:run:weather.py auth=key env=API_KEY sandbox=true"
    );
}

#[test]
fn test_export_remote_without_options() {
    let entry = remote_server("api", TransportType::Websocket, "wss://api.dev/ws");
    assert_eq!(HostsAdapter.export(&entry).unwrap(), "api remote websocket wss://api.dev/ws");
}

#[test]
fn test_requires_auth_alone_exports_key() {
    let entry = remote_server("api", TransportType::Https, "https://api.dev").with_security(Security {
        requires_auth: true,
        ..Security::default()
    });
    assert_eq!(
        HostsAdapter.export(&entry).unwrap(),
        "api remote https https://api.dev auth=key"
    );
}

#[test]
fn test_import_multiple_lines() {
    let text = "\
# local tools
files   local  stdio npx:-y:@modelcontextprotocol/server-filesystem
hybrid  hybrid https https://hybrid.dev/mcp auth=key
"
    .to_string();
    let entries = HostsAdapter.import(&text).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[0].config.args(),
        ["-y", "@modelcontextprotocol/server-filesystem"]
    );
    assert_eq!(entries[1].deployment, DeploymentType::Hybrid);
    assert!(entries[1].requires_auth());
    assert!(entries[1].config.headers().unwrap().is_empty());
}

#[test]
fn test_unknown_transport_is_line_error() {
    let text = "x remote sse https://x.dev".to_string();
    let batch = HostsAdapter.import_batch(&text).unwrap();
    assert!(batch.entries.is_empty());
    assert_eq!(batch.errors[0].path, "line 1");
}
