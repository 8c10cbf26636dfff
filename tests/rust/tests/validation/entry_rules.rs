//! Tests for per-entry validation

use mcpconf_core::{
    validate_entry, Capabilities, DeploymentType, IssueCode, RemoteConfig, Requirements, Security,
    ServerConfig, ServerEntry, Severity, StdioConfig, TransportType,
};
use pretty_assertions::assert_eq;
use tests::fixtures::{full_server, local_server, remote_server};

fn mismatches(entry: &ServerEntry) -> usize {
    validate_entry(entry)
        .iter()
        .filter(|i| i.code == IssueCode::DeploymentConfigMismatch)
        .count()
}

#[test]
fn test_well_formed_entries_have_no_issues() {
    assert!(validate_entry(&full_server("weather")).is_empty());
    assert!(validate_entry(&local_server("files")).is_empty());
    assert!(validate_entry(&remote_server("api", TransportType::Https, "https://api.dev/mcp")).is_empty());
}

#[test]
fn test_remote_without_url_is_exactly_one_error() {
    let entry = ServerEntry::new("x", "X", DeploymentType::Remote, StdioConfig::new("node")).unwrap();
    let issues = validate_entry(&entry);

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, IssueCode::DeploymentConfigMismatch);
    assert_eq!(issues[0].severity, Severity::Error);
    assert_eq!(issues[0].code.as_str(), "DEPLOYMENT_CONFIG_MISMATCH");
}

#[test]
fn test_deployment_consistency_both_directions() {
    let local_ok = local_server("a");
    let local_with_url = ServerEntry::new(
        "b",
        "B",
        DeploymentType::Local,
        ServerConfig::remote(TransportType::Https, RemoteConfig::new("https://b.dev")).unwrap(),
    )
    .unwrap();
    let local_blank_command =
        ServerEntry::new("c", "C", DeploymentType::Local, StdioConfig::new("  ")).unwrap();
    let remote_ok = remote_server("d", TransportType::Websocket, "wss://d.dev/ws");
    let remote_blank_url = remote_server("e", TransportType::Https, "");

    assert_eq!(mismatches(&local_ok), 0);
    assert_eq!(mismatches(&local_with_url), 1);
    assert_eq!(mismatches(&local_blank_command), 1);
    assert_eq!(mismatches(&remote_ok), 0);
    assert_eq!(mismatches(&remote_blank_url), 1);
}

#[test]
fn test_malformed_runtime_range_is_error_but_entry_loads() {
    let entry: ServerEntry = serde_json::from_value(serde_json::json!({
        "name": "Weather",
        "deployment": "local",
        "config": { "transport": "stdio", "command": "uv" },
        "requirements": { "runtimes": { "python": "not-a-range" } }
    }))
    .unwrap();

    let issues = validate_entry(&entry);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, IssueCode::InvalidRuntimeRange);
    assert_eq!(issues[0].code.as_str(), "INVALID_RUNTIME_RANGE");
    assert_eq!(issues[0].path, "requirements.runtimes.python");
    assert!(issues[0].is_error());
}

#[test]
fn test_every_issue_is_reported_in_one_pass() {
    let mut requirements = Requirements::default();
    requirements.runtimes.insert("node".into(), "eighteen".into());

    let config = ServerConfig::remote(TransportType::Http, RemoteConfig::new("https://x.dev"))
        .unwrap()
        .with_timeout(0);
    let entry = ServerEntry::new("x", "", DeploymentType::Remote, config)
        .unwrap()
        .with_requirements(requirements)
        .with_compatibility("vscode", "latest")
        .with_version("v1")
        .with_source_url("not a url");

    let codes: Vec<IssueCode> = validate_entry(&entry).iter().map(|i| i.code).collect();
    assert_eq!(
        codes,
        vec![
            IssueCode::MissingName,
            IssueCode::ZeroTimeout,
            IssueCode::TransportUrlMismatch,
            IssueCode::InvalidRuntimeRange,
            IssueCode::InvalidCompatibilityRange,
            IssueCode::InvalidVersion,
            IssueCode::InvalidSourceUrl,
        ]
    );
}

#[test]
fn test_warnings_are_not_errors() {
    let entry = local_server("x").with_version("1.0");
    let issues = validate_entry(&entry);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::Warning);
}

#[test]
fn test_hybrid_needs_command_or_url() {
    let with_command =
        ServerEntry::new("h", "H", DeploymentType::Hybrid, StdioConfig::new("node")).unwrap();
    assert!(validate_entry(&with_command).is_empty());

    let neither = ServerEntry::new("h", "H", DeploymentType::Hybrid, StdioConfig::new(" ")).unwrap();
    let issues = validate_entry(&neither);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, IssueCode::DeploymentConfigMismatch);
    assert_eq!(issues[0].severity, Severity::Error);
    assert_eq!(issues[0].path, "config");
}

#[test]
fn test_unparseable_url_is_error() {
    for url in ["api.dev/mcp", "https://"] {
        let issues = validate_entry(&remote_server("api", TransportType::Https, url));
        assert_eq!(issues.len(), 1, "{}", url);
        assert_eq!(issues[0].code, IssueCode::InvalidUrl);
        assert_eq!(issues[0].code.as_str(), "INVALID_URL");
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].path, "config.url");
    }

    // placeholders are never parsed
    let templated = remote_server("api", TransportType::Https, "https://${input:host}/mcp");
    assert!(validate_entry(&templated).is_empty());
}

#[test]
fn test_blank_permission_is_warning() {
    let entry = local_server("x").with_security(Security {
        permissions: vec!["network.http".into(), " ".into()],
        ..Security::default()
    });
    let issues = validate_entry(&entry);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, IssueCode::EmptyPermission);
    assert_eq!(issues[0].code.as_str(), "EMPTY_PERMISSION");
    assert_eq!(issues[0].severity, Severity::Warning);
    assert_eq!(issues[0].path, "security.permissions[1]");
}

#[test]
fn test_repeated_capability_is_warning() {
    let entry = local_server("x").with_capabilities(Capabilities {
        tools: vec!["forecast".into(), "forecast".into()],
        prompts: vec!["summarize".into()],
        ..Capabilities::default()
    });
    let issues = validate_entry(&entry);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, IssueCode::DuplicateCapability);
    assert_eq!(issues[0].code.as_str(), "DUPLICATE_CAPABILITY");
    assert_eq!(issues[0].severity, Severity::Warning);
    assert_eq!(issues[0].path, "capabilities.tools[1]");
}
