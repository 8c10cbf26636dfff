//! hosts-line format: one compact, human-skimmable line per server.
//!
//! ```text
//! # id          deployment transport endpoint                    options
//! weather-local local      stdio     uv:run:weather.py           auth=key env=API_KEY
//! sentry        remote     https     https://mcp.sentry.dev/mcp  auth=bearer
//! ```
//!
//! The stdio endpoint joins command and args with `:`. Options are limited to
//! `auth=bearer|key`, `env=NAME[,NAME...]` and `sandbox=true|false`. There is
//! no escaping: a value that would need it is a conversion error in both
//! directions.

use indexmap::IndexMap;

use super::{display_name_from_id, Format, FormatAdapter, ImportBatch};
use crate::domain::{
    DeploymentType, RemoteConfig, Security, ServerConfig, ServerEntry, StdioConfig, TransportType,
};
use crate::error::ConversionError;

const AUTHORIZATION: &str = "Authorization";
const BEARER_TEMPLATE: &str = "Bearer ${input:token}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthKind {
    Bearer,
    Key,
}

impl AuthKind {
    fn as_str(&self) -> &'static str {
        match self {
            AuthKind::Bearer => "bearer",
            AuthKind::Key => "key",
        }
    }
}

#[derive(Debug, Default)]
struct LineOptions {
    auth: Option<AuthKind>,
    env: Vec<String>,
    sandbox: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HostsAdapter;

impl HostsAdapter {
    fn line_error(&self, number: usize, message: impl Into<String>) -> ConversionError {
        ConversionError::new(self.format(), format!("line {}", number), message)
    }

    fn parse_options<'a>(
        &self,
        number: usize,
        tokens: impl Iterator<Item = &'a str>,
    ) -> Result<LineOptions, ConversionError> {
        let mut options = LineOptions::default();
        let mut seen: Vec<&str> = Vec::new();

        for token in tokens {
            let Some((key, value)) = token.split_once('=') else {
                return Err(self.line_error(number, format!("option '{}' is not key=value", token)));
            };
            if value.is_empty() || value.contains('=') {
                return Err(self.line_error(number, format!("ambiguous option value in '{}'", token)));
            }
            if seen.contains(&key) {
                return Err(self.line_error(number, format!("option '{}' given more than once", key)));
            }
            seen.push(key);

            match key {
                "auth" => {
                    options.auth = Some(match value {
                        "bearer" => AuthKind::Bearer,
                        "key" => AuthKind::Key,
                        other => {
                            return Err(self.line_error(
                                number,
                                format!("unknown auth kind '{}' (expected bearer or key)", other),
                            ))
                        }
                    });
                }
                "env" => {
                    for name in value.split(',') {
                        if name.is_empty() {
                            return Err(self.line_error(number, format!("empty name in '{}'", token)));
                        }
                        options.env.push(name.to_string());
                    }
                }
                "sandbox" => {
                    options.sandbox = Some(value.parse::<bool>().map_err(|_| {
                        self.line_error(number, format!("sandbox must be true or false, got '{}'", value))
                    })?);
                }
                other => {
                    return Err(self.line_error(number, format!("unknown option '{}'", other)));
                }
            }
        }
        Ok(options)
    }

    fn parse_line(&self, number: usize, line: &str) -> Result<ServerEntry, ConversionError> {
        let mut tokens = line.split_whitespace();
        let (Some(id), Some(deployment), Some(transport), Some(endpoint)) =
            (tokens.next(), tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(self.line_error(
                number,
                "expected 'id deployment transport endpoint [key=value ...]'",
            ));
        };

        let deployment = deployment
            .parse::<DeploymentType>()
            .map_err(|e| self.line_error(number, e.to_string()))?;
        let transport = transport
            .parse::<TransportType>()
            .map_err(|e| self.line_error(number, e.to_string()))?;
        let options = self.parse_options(number, tokens)?;

        let config = match transport {
            TransportType::Stdio => {
                let mut parts = endpoint.split(':');
                let command = parts.next().unwrap_or_default();
                if command.is_empty() {
                    return Err(self.line_error(number, "stdio endpoint has an empty command"));
                }
                let env: IndexMap<String, String> = options
                    .env
                    .iter()
                    .map(|name| (name.clone(), format!("${{env:{}}}", name)))
                    .collect();
                ServerConfig::Stdio(StdioConfig {
                    args: parts.map(str::to_string).collect(),
                    env,
                    ..StdioConfig::new(command)
                })
            }
            remote => {
                if !options.env.is_empty() {
                    return Err(self.line_error(number, "env= applies only to stdio servers"));
                }
                let mut config = RemoteConfig::new(endpoint);
                if options.auth == Some(AuthKind::Bearer) {
                    config = config.with_header(AUTHORIZATION, BEARER_TEMPLATE);
                }
                ServerConfig::remote(remote, config).map_err(|e| self.line_error(number, e.to_string()))?
            }
        };

        let mut entry = ServerEntry::new(id, display_name_from_id(id), deployment, config)
            .map_err(|e| self.line_error(number, e.to_string()))?;
        if options.auth.is_some() || options.sandbox.is_some() {
            entry.security = Some(Security {
                requires_auth: options.auth.is_some(),
                permissions: Vec::new(),
                sandbox: options.sandbox.unwrap_or(false),
            });
        }
        Ok(entry)
    }

    fn export_error(&self, path: impl Into<String>, message: impl Into<String>) -> ConversionError {
        ConversionError::new(self.format(), path, message)
    }

    fn check_token(&self, path: impl Into<String>, value: &str, separators: &[char]) -> Result<(), ConversionError> {
        if value.is_empty() {
            return Err(self.export_error(path, "empty value has no hosts-line form"));
        }
        if value.chars().any(|c| c.is_whitespace() || separators.contains(&c)) {
            return Err(self.export_error(
                path,
                format!("'{}' contains whitespace or a separator and cannot be written unescaped", value),
            ));
        }
        Ok(())
    }

    fn auth_kind(entry: &ServerEntry) -> Option<AuthKind> {
        if let Some(header) = entry.config.headers().and_then(|h| h.get(AUTHORIZATION)) {
            return Some(if header.starts_with("Bearer") {
                AuthKind::Bearer
            } else {
                AuthKind::Key
            });
        }
        let secret_env = entry
            .config
            .env()
            .map(|env| env.keys().any(|k| k.ends_with("KEY") || k.ends_with("TOKEN")))
            .unwrap_or(false);
        if secret_env || entry.requires_auth() {
            return Some(AuthKind::Key);
        }
        None
    }
}

impl FormatAdapter for HostsAdapter {
    type Document = String;

    fn format(&self) -> Format {
        Format::Hosts
    }

    fn import_batch(&self, document: &String) -> Result<ImportBatch, ConversionError> {
        let mut batch = ImportBatch::default();
        for (index, line) in document.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            batch.push(self.parse_line(index + 1, line));
        }
        Ok(batch)
    }

    fn export(&self, entry: &ServerEntry) -> Result<String, ConversionError> {
        self.check_token("id", entry.id(), &[])?;
        if entry.id().starts_with('#') {
            return Err(self.export_error("id", "an id starting with '#' would be read back as a comment"));
        }

        let endpoint = match &entry.config {
            ServerConfig::Stdio(stdio) => {
                self.check_token("config.command", &stdio.command, &[':'])?;
                for (index, arg) in stdio.args.iter().enumerate() {
                    self.check_token(format!("config.args[{}]", index), arg, &[':'])?;
                }
                std::iter::once(stdio.command.as_str())
                    .chain(stdio.args.iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(":")
            }
            ServerConfig::Http(remote) | ServerConfig::Https(remote) | ServerConfig::Websocket(remote) => {
                self.check_token("config.url", &remote.url, &[])?;
                remote.url.clone()
            }
        };

        let mut parts = vec![
            entry.id().to_string(),
            entry.deployment.to_string(),
            entry.config.transport().to_string(),
            endpoint,
        ];

        if let Some(auth) = Self::auth_kind(entry) {
            parts.push(format!("auth={}", auth.as_str()));
        }
        if let Some(env) = entry.config.env().filter(|env| !env.is_empty()) {
            for name in env.keys() {
                self.check_token(format!("config.env.{}", name), name, &[',', '='])?;
            }
            let names: Vec<&str> = env.keys().map(String::as_str).collect();
            parts.push(format!("env={}", names.join(",")));
        }
        if entry.is_sandboxed() {
            parts.push("sandbox=true".to_string());
        }

        Ok(parts.join(" "))
    }
}
