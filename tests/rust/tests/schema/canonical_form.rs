//! Tests for the canonical registry document (JSON and YAML)

use mcpconf_core::{Registry, TransportType};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::fixtures::{full_server, local_server, registry_json};

#[test]
fn test_loads_keyed_servers_in_order() {
    let registry: Registry = serde_json::from_value(registry_json()).unwrap();

    assert_eq!(registry.version, "1.0");
    assert_eq!(registry.server_ids(), vec!["weather", "sentry"]);
    assert_eq!(registry.get("weather").unwrap().id(), "weather");
    assert_eq!(
        registry.get("sentry").unwrap().config.transport(),
        TransportType::Https
    );
    assert_eq!(registry.category("utilities"), ["weather".to_string()]);
}

#[test]
fn test_full_entry_round_trips_through_json_and_yaml() {
    let mut registry = Registry::new();
    for entry in [full_server("weather"), local_server("files")] {
        registry.servers.insert(entry.id().to_string(), entry);
    }
    registry
        .categories
        .insert("utilities".into(), vec!["files".into(), "weather".into()]);

    let json_text = serde_json::to_string_pretty(&registry).unwrap();
    let from_json: Registry = serde_json::from_str(&json_text).unwrap();
    assert_eq!(from_json, registry);

    let yaml_text = serde_yaml::to_string(&registry).unwrap();
    let from_yaml: Registry = serde_yaml::from_str(&yaml_text).unwrap();
    assert_eq!(from_yaml, registry);
    assert_eq!(from_yaml.server_ids(), vec!["weather", "files"]);
}

#[test]
fn test_placeholders_survive_verbatim() {
    let registry: Registry = serde_json::from_value(registry_json()).unwrap();
    let text = serde_json::to_string(&registry).unwrap();
    let reloaded: Registry = serde_json::from_str(&text).unwrap();

    let weather = reloaded.get("weather").unwrap();
    assert_eq!(weather.config.env().unwrap()["API_KEY"], "${input:weather_key}");
    let sentry = reloaded.get("sentry").unwrap();
    assert_eq!(
        sentry.config.headers().unwrap()["Authorization"],
        "Bearer ${input:sentry_token}"
    );
}

#[test]
fn test_body_id_must_match_key() {
    let doc = json!({
        "version": "1.0",
        "servers": {
            "weather": {
                "id": "forecast",
                "name": "Weather",
                "deployment": "local",
                "config": { "transport": "stdio", "command": "uv" }
            }
        }
    });
    let err = serde_json::from_value::<Registry>(doc).unwrap_err();
    assert!(err.to_string().contains("different id 'forecast'"));
}

#[test]
fn test_array_entries_need_an_id() {
    let doc = json!({
        "version": "1.0",
        "servers": [
            { "name": "Weather", "deployment": "local",
              "config": { "transport": "stdio", "command": "uv" } }
        ]
    });
    assert!(serde_json::from_value::<Registry>(doc).is_err());
}

#[test]
fn test_version_is_required() {
    let doc = json!({ "servers": {} });
    assert!(serde_json::from_value::<Registry>(doc).is_err());
}
