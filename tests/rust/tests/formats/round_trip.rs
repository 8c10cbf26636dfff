//! `export(import(export(entry))) == export(entry)` for every adapter

use mcpconf_core::{
    ClaudeDesktopAdapter, DxtAdapter, FormatAdapter, GithubMcpAdapter, HostsAdapter, InputHint,
    RemoteConfig, Security, ServerConfig, ServerEntry, TransportType,
};
use pretty_assertions::assert_eq;
use tests::fixtures::{full_server, local_server, remote_server};

fn assert_round_trip<A>(adapter: &A, entry: &ServerEntry)
where
    A: FormatAdapter,
    A::Document: PartialEq + std::fmt::Debug,
{
    let first = adapter.export(entry).unwrap();
    let imported = adapter.import(&first).unwrap();
    assert_eq!(imported.len(), 1);
    let second = adapter.export(&imported[0]).unwrap();
    assert_eq!(second, first);
}

fn bearer_server() -> ServerEntry {
    let config = ServerConfig::remote(
        TransportType::Https,
        RemoteConfig::new("https://api.githubcopilot.com/mcp/")
            .with_header("Authorization", "Bearer ${input:github_pat}"),
    )
    .unwrap();
    let mut hint = InputHint::new("github_pat");
    hint.password = true;
    ServerEntry::new("github", "GitHub", mcpconf_core::DeploymentType::Remote, config)
        .unwrap()
        .with_inputs(vec![hint])
        .with_security(Security {
            requires_auth: true,
            ..Security::default()
        })
}

#[test]
fn test_claude_desktop_round_trip() {
    for entry in [
        full_server("weather"),
        local_server("files"),
        remote_server("api", TransportType::Https, "https://api.dev/mcp"),
        bearer_server(),
    ] {
        assert_round_trip(&ClaudeDesktopAdapter, &entry);
    }
}

#[test]
fn test_github_mcp_round_trip() {
    for entry in [
        remote_server("api", TransportType::Http, "http://localhost:3000/mcp"),
        remote_server("ws", TransportType::Websocket, "ws://localhost:3000"),
        bearer_server(),
        remote_server("api", TransportType::Https, "https://api.dev/mcp")
            .with_inputs(vec![InputHint::new("api_token")]),
        bearer_server().with_inputs(vec![InputHint::new("github_pat"), InputHint::new("unused")]),
    ] {
        assert_round_trip(&GithubMcpAdapter, &entry);
    }
}

#[test]
fn test_dxt_round_trip() {
    for entry in [full_server("weather"), local_server("files")] {
        assert_round_trip(&DxtAdapter, &entry);
    }
}

#[test]
fn test_hosts_round_trip() {
    for entry in [
        full_server("weather"),
        local_server("files"),
        remote_server("api", TransportType::Https, "https://api.dev/mcp"),
        bearer_server(),
    ] {
        assert_round_trip(&HostsAdapter, &entry);
    }
}
