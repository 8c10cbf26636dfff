//! Claude Desktop `mcpServers` format.
//!
//! ```json
//! { "mcpServers": { "weather": { "command": "uv", "args": ["run", "weather.py"] } } }
//! ```
//!
//! Export emits `command`/`args`/`env` or `url` and nothing else. Metadata,
//! capabilities, requirements, security and headers are dropped on export and
//! left unset on import (name and description get import defaults).

use serde_json::{json, Map, Value};

use super::fields::Fields;
use super::{display_name_from_id, Format, FormatAdapter, ImportBatch};
use crate::domain::{DeploymentType, RemoteConfig, ServerConfig, ServerEntry, StdioConfig, TransportType};
use crate::error::ConversionError;

const SERVERS_KEY: &str = "mcpServers";
const IMPORT_DESCRIPTION: &str = "Imported from Claude Desktop configuration";

#[derive(Debug, Clone, Copy, Default)]
pub struct ClaudeDesktopAdapter;

impl ClaudeDesktopAdapter {
    fn import_server(&self, id: &str, servers: &Fields<'_>) -> Result<ServerEntry, ConversionError> {
        let server = servers.required_object(id)?;
        let command = server.string("command")?;
        let url = server.string("url")?;

        let (deployment, config) = match (command, url) {
            (Some(_), Some(_)) => {
                return Err(servers.error(id, "entry sets both 'command' and 'url'"));
            }
            (Some(command), None) => {
                let stdio = StdioConfig {
                    args: server.string_list("args")?,
                    env: server.string_map("env")?,
                    ..StdioConfig::new(command)
                };
                (DeploymentType::Local, ServerConfig::Stdio(stdio))
            }
            (None, Some(url)) => {
                // No recognizable scheme (e.g. a placeholder URL) means plain http
                let transport = TransportType::from_url(&url).unwrap_or(TransportType::Http);
                let remote = RemoteConfig {
                    headers: server.string_map("headers")?,
                    ..RemoteConfig::new(url)
                };
                let config = ServerConfig::remote(transport, remote)
                    .map_err(|e| server.error("url", e.to_string()))?;
                (DeploymentType::Remote, config)
            }
            (None, None) => {
                return Err(server.error("command", "entry has neither 'command' nor 'url'"));
            }
        };

        ServerEntry::new(id, display_name_from_id(id), deployment, config)
            .map(|entry| entry.with_description(IMPORT_DESCRIPTION))
            .map_err(|e| servers.error(id, e.to_string()))
    }
}

impl FormatAdapter for ClaudeDesktopAdapter {
    type Document = Value;

    fn format(&self) -> Format {
        Format::ClaudeDesktop
    }

    fn import_batch(&self, document: &Value) -> Result<ImportBatch, ConversionError> {
        let root = Fields::of(self.format(), document, "")?;
        let servers = root.required_object(SERVERS_KEY)?;

        let mut batch = ImportBatch::default();
        for (id, _) in servers.entries() {
            batch.push(self.import_server(id, &servers));
        }
        Ok(batch)
    }

    fn export(&self, entry: &ServerEntry) -> Result<Value, ConversionError> {
        let mut server = Map::new();
        match &entry.config {
            ServerConfig::Stdio(stdio) => {
                if stdio.command.trim().is_empty() {
                    return Err(ConversionError::new(self.format(), "config.command", "command is empty"));
                }
                server.insert("command".into(), json!(stdio.command));
                if !stdio.args.is_empty() {
                    server.insert("args".into(), json!(stdio.args));
                }
                if !stdio.env.is_empty() {
                    server.insert("env".into(), json!(stdio.env));
                }
            }
            ServerConfig::Http(remote) | ServerConfig::Https(remote) | ServerConfig::Websocket(remote) => {
                if remote.url.trim().is_empty() {
                    return Err(ConversionError::new(self.format(), "config.url", "url is empty"));
                }
                server.insert("url".into(), json!(remote.url));
            }
        }

        let mut servers = Map::new();
        servers.insert(entry.id().to_string(), Value::Object(server));
        Ok(json!({ SERVERS_KEY: servers }))
    }
}
