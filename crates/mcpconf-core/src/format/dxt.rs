//! DXT extension manifest (`manifest.json`).
//!
//! A manifest describes exactly one local server. `user_config` entries are
//! imported as input hints; the `${user_config.*}` tokens they back stay
//! verbatim in `args` and `env`.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use super::fields::{string_or_field, Fields};
use super::{Format, FormatAdapter, ImportBatch};
use crate::domain::{
    Capabilities, DeploymentType, InputHint, Requirements, ServerConfig, ServerEntry, StdioConfig,
};
use crate::error::ConversionError;

/// Manifest version written on export
pub const DXT_VERSION: &str = "1.0";

const SERVER_TYPES: [&str; 3] = ["node", "python", "binary"];
const PYTHON_COMMANDS: [&str; 4] = ["python", "python3", "uv", "uvx"];

#[derive(Debug, Clone, Copy, Default)]
pub struct DxtAdapter;

impl DxtAdapter {
    fn import_manifest(&self, root: &Fields<'_>) -> Result<ServerEntry, ConversionError> {
        let id = root.required_string("name")?;
        let name = root.string("display_name")?.unwrap_or_else(|| id.clone());

        let server = root.required_object("server")?;
        let server_type = server.required_string("type")?;
        if !SERVER_TYPES.contains(&server_type.as_str()) {
            return Err(server.error(
                "type",
                format!("unsupported server type '{}' (expected node, python or binary)", server_type),
            ));
        }

        let mcp_config = server.required_object("mcp_config")?;
        let stdio = StdioConfig {
            args: mcp_config.string_list("args")?,
            env: mcp_config.string_map("env")?,
            ..StdioConfig::new(mcp_config.required_string("command")?)
        };

        let mut entry = ServerEntry::new(id, name, DeploymentType::Local, stdio)
            .map_err(|e| root.error("name", e.to_string()))?;
        entry.version = root.string("version")?;
        entry.description = root.string("description")?;
        entry.license = root.string("license")?;
        entry.author = string_or_field(root, "author", "name")?;
        entry.source_url = string_or_field(root, "repository", "url")?;

        let capabilities = Capabilities {
            tools: named_items(root, "tools")?,
            resources: Vec::new(),
            prompts: named_items(root, "prompts")?,
        };
        if !capabilities.is_empty() {
            entry.capabilities = Some(capabilities);
        }

        if let Some(compatibility) = root.object("compatibility")? {
            let requirements = Requirements {
                platforms: compatibility.string_list("platforms")?,
                runtimes: compatibility.string_map("runtimes")?,
                ..Requirements::default()
            };
            if !requirements.is_empty() {
                entry.requirements = Some(requirements);
            }
            for (client, range) in compatibility.entries() {
                if let Value::String(range) = range {
                    entry.compatibility.insert(client.clone(), range.clone());
                }
            }
        }

        if let Some(user_config) = root.object("user_config")? {
            for (key, _) in user_config.entries() {
                let option = user_config.required_object(key)?;
                entry.inputs.push(InputHint {
                    id: key.clone(),
                    description: option.string("description")?,
                    password: option.bool("sensitive")?.unwrap_or(false),
                    required: option.bool("required")?.unwrap_or(false),
                });
            }
        }

        Ok(entry)
    }

    fn export_error(&self, path: &str, message: impl Into<String>) -> ConversionError {
        ConversionError::new(self.format(), path, message)
    }
}

/// Names from an array of `{ "name": ... }` objects or bare strings.
fn named_items(root: &Fields<'_>, key: &str) -> Result<Vec<String>, ConversionError> {
    root.array(key)?
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let path = format!("{}[{}]", root.path_of(key), index);
            match item {
                Value::String(name) => Ok(name.clone()),
                other => Fields::of(Format::Dxt, other, path)?.required_string("name"),
            }
        })
        .collect()
}

fn server_type(command: &str) -> &'static str {
    if PYTHON_COMMANDS.contains(&command) {
        "python"
    } else {
        "node"
    }
}

impl FormatAdapter for DxtAdapter {
    type Document = Value;

    fn format(&self) -> Format {
        Format::Dxt
    }

    fn import_batch(&self, document: &Value) -> Result<ImportBatch, ConversionError> {
        let root = Fields::of(self.format(), document, "")?;
        let mut batch = ImportBatch::default();
        batch.push(self.import_manifest(&root));
        Ok(batch)
    }

    fn export(&self, entry: &ServerEntry) -> Result<Value, ConversionError> {
        let ServerConfig::Stdio(stdio) = &entry.config else {
            return Err(self.export_error(
                "config.transport",
                format!(
                    "{} transport cannot be represented; manifests launch a local command",
                    entry.config.transport()
                ),
            ));
        };
        if stdio.command.trim().is_empty() {
            return Err(self.export_error("config.command", "command is required"));
        }

        let mut manifest = Map::new();
        manifest.insert("dxt_version".into(), json!(DXT_VERSION));
        manifest.insert("name".into(), json!(entry.id()));
        manifest.insert("display_name".into(), json!(entry.name));
        if let Some(version) = &entry.version {
            manifest.insert("version".into(), json!(version));
        }
        if let Some(description) = &entry.description {
            manifest.insert("description".into(), json!(description));
        }
        if let Some(author) = &entry.author {
            manifest.insert("author".into(), json!({ "name": author }));
        }
        if let Some(license) = &entry.license {
            manifest.insert("license".into(), json!(license));
        }
        if let Some(source_url) = &entry.source_url {
            manifest.insert("repository".into(), json!({ "type": "git", "url": source_url }));
        }

        let mut mcp_config = Map::new();
        mcp_config.insert("command".into(), json!(stdio.command));
        mcp_config.insert("args".into(), json!(stdio.args));
        if !stdio.env.is_empty() {
            mcp_config.insert("env".into(), json!(stdio.env));
        }
        manifest.insert(
            "server".into(),
            json!({ "type": server_type(&stdio.command), "mcp_config": mcp_config }),
        );

        if let Some(capabilities) = &entry.capabilities {
            if !capabilities.tools.is_empty() {
                let tools: Vec<Value> = capabilities
                    .tools
                    .iter()
                    .map(|tool| json!({ "name": tool, "description": format!("Tool: {}", tool) }))
                    .collect();
                manifest.insert("tools".into(), Value::Array(tools));
            }
            if !capabilities.prompts.is_empty() {
                let prompts: Vec<Value> = capabilities
                    .prompts
                    .iter()
                    .map(|prompt| json!({ "name": prompt }))
                    .collect();
                manifest.insert("prompts".into(), Value::Array(prompts));
            }
        }

        let mut compatibility: Map<String, Value> = entry
            .compatibility
            .iter()
            .map(|(client, range)| (client.clone(), json!(range)))
            .collect();
        if let Some(requirements) = &entry.requirements {
            if !requirements.platforms.is_empty() {
                compatibility.insert("platforms".into(), json!(requirements.platforms));
            }
            if !requirements.runtimes.is_empty() {
                compatibility.insert("runtimes".into(), json!(requirements.runtimes));
            }
        }
        if !compatibility.is_empty() {
            manifest.insert("compatibility".into(), Value::Object(compatibility));
        }

        if !entry.inputs.is_empty() {
            let user_config: IndexMap<&str, Value> = entry
                .inputs
                .iter()
                .map(|hint| {
                    let mut option = Map::new();
                    option.insert("type".into(), json!("string"));
                    option.insert("title".into(), json!(hint.id));
                    if let Some(description) = &hint.description {
                        option.insert("description".into(), json!(description));
                    }
                    option.insert("sensitive".into(), json!(hint.password));
                    option.insert("required".into(), json!(hint.required));
                    (hint.id.as_str(), Value::Object(option))
                })
                .collect();
            manifest.insert("user_config".into(), json!(user_config));
        }

        Ok(Value::Object(manifest))
    }
}
