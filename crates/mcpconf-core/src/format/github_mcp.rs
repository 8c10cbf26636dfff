//! GitHub MCP / VS Code `mcp.json` format.
//!
//! ```json
//! {
//!   "inputs": [{ "type": "promptString", "id": "github_pat", "password": true }],
//!   "servers": {
//!     "github": {
//!       "type": "http",
//!       "url": "https://api.githubcopilot.com/mcp/",
//!       "headers": { "Authorization": "Bearer ${input:github_pat}" }
//!     }
//!   }
//! }
//! ```
//!
//! Only network transports are representable. Prompted `inputs` become
//! `InputHint` metadata on the entries that reference them, and only those
//! hints are written back on export. Their values are never materialized.

use serde_json::{json, Map, Value};

use super::fields::Fields;
use super::{display_name_from_id, Format, FormatAdapter, ImportBatch};
use crate::domain::placeholder::input_names;
use crate::domain::{DeploymentType, InputHint, RemoteConfig, ServerConfig, ServerEntry, TransportType};
use crate::error::ConversionError;

const SERVERS_KEY: &str = "servers";
const INPUTS_KEY: &str = "inputs";
const IMPORT_DESCRIPTION: &str = "Imported from GitHub MCP configuration";

#[derive(Debug, Clone, Copy, Default)]
pub struct GithubMcpAdapter;

/// Hints whose `${input:ID}` appears in the url or a header value.
fn referenced_inputs<'a>(remote: &RemoteConfig, inputs: &'a [InputHint]) -> Vec<&'a InputHint> {
    let mut referenced: Vec<&str> = input_names(&remote.url).collect();
    for value in remote.headers.values() {
        referenced.extend(input_names(value));
    }
    inputs
        .iter()
        .filter(|hint| referenced.contains(&hint.id.as_str()))
        .collect()
}

impl GithubMcpAdapter {
    fn import_inputs(&self, root: &Fields<'_>) -> Result<Vec<InputHint>, ConversionError> {
        root.array(INPUTS_KEY)?
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let input = Fields::of(self.format(), value, format!("{}[{}]", INPUTS_KEY, index))?;
                Ok(InputHint {
                    id: input.required_string("id")?,
                    description: input.string("description")?,
                    password: input.bool("password")?.unwrap_or(false),
                    required: false,
                })
            })
            .collect()
    }

    fn import_server(
        &self,
        id: &str,
        servers: &Fields<'_>,
        inputs: &[InputHint],
    ) -> Result<ServerEntry, ConversionError> {
        let server = servers.required_object(id)?;

        let kind = server.required_string("type")?;
        let transport = kind
            .parse::<TransportType>()
            .ok()
            .filter(TransportType::is_remote)
            .ok_or_else(|| {
                server.error(
                    "type",
                    format!("unsupported server type '{}' (expected http, https or websocket)", kind),
                )
            })?;

        let remote = RemoteConfig {
            headers: server.string_map("headers")?,
            ..RemoteConfig::new(server.required_string("url")?)
        };

        let hints: Vec<InputHint> = referenced_inputs(&remote, inputs).into_iter().cloned().collect();

        let config = ServerConfig::remote(transport, remote).map_err(|e| server.error("type", e.to_string()))?;
        ServerEntry::new(id, display_name_from_id(id), DeploymentType::Remote, config)
            .map(|entry| entry.with_description(IMPORT_DESCRIPTION).with_inputs(hints))
            .map_err(|e| servers.error(id, e.to_string()))
    }
}

impl FormatAdapter for GithubMcpAdapter {
    type Document = Value;

    fn format(&self) -> Format {
        Format::GithubMcp
    }

    fn import_batch(&self, document: &Value) -> Result<ImportBatch, ConversionError> {
        let root = Fields::of(self.format(), document, "")?;
        let servers = root.required_object(SERVERS_KEY)?;
        let inputs = self.import_inputs(&root)?;

        let mut batch = ImportBatch::default();
        for (id, _) in servers.entries() {
            batch.push(self.import_server(id, &servers, &inputs));
        }
        Ok(batch)
    }

    fn export(&self, entry: &ServerEntry) -> Result<Value, ConversionError> {
        let Some(remote) = entry.config.as_remote() else {
            return Err(ConversionError::new(
                self.format(),
                "config.transport",
                format!(
                    "{} transport cannot be represented; only http, https and websocket servers are supported",
                    entry.config.transport()
                ),
            ));
        };
        if remote.url.trim().is_empty() {
            return Err(ConversionError::new(self.format(), "config.url", "url is empty"));
        }

        let mut server = Map::new();
        server.insert("type".into(), json!(entry.config.transport().as_str()));
        server.insert("url".into(), json!(remote.url));
        if !remote.headers.is_empty() {
            server.insert("headers".into(), json!(remote.headers));
        }

        let mut servers = Map::new();
        servers.insert(entry.id().to_string(), Value::Object(server));

        let mut document = Map::new();
        // Unreferenced hints would not survive a re-import
        let inputs: Vec<Value> = referenced_inputs(remote, &entry.inputs)
            .into_iter()
            .map(|hint| {
                let mut input = Map::new();
                input.insert("type".into(), json!("promptString"));
                input.insert("id".into(), json!(hint.id));
                if let Some(description) = &hint.description {
                    input.insert("description".into(), json!(description));
                }
                if hint.password {
                    input.insert("password".into(), json!(true));
                }
                Value::Object(input)
            })
            .collect();
        if !inputs.is_empty() {
            document.insert(INPUTS_KEY.into(), Value::Array(inputs));
        }
        document.insert(SERVERS_KEY.into(), Value::Object(servers));
        Ok(Value::Object(document))
    }
}
