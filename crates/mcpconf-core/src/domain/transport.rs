use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// Transport type for connecting to MCP servers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    /// Local process via stdio
    Stdio,
    /// Remote server via plain HTTP
    Http,
    /// Remote server via HTTPS
    Https,
    /// Remote server via WebSocket
    Websocket,
}

impl TransportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
            Self::Https => "https",
            Self::Websocket => "websocket",
        }
    }

    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::Stdio)
    }

    /// URL schemes a remote transport accepts.
    pub fn url_schemes(&self) -> &'static [&'static str] {
        match self {
            Self::Stdio => &[],
            Self::Http => &["http"],
            Self::Https => &["https"],
            Self::Websocket => &["ws", "wss"],
        }
    }

    /// Infer the remote transport from a URL's scheme.
    pub fn from_url(url: &str) -> Option<Self> {
        let (scheme, _) = url.split_once("://")?;
        match scheme.to_ascii_lowercase().as_str() {
            "http" => Some(Self::Http),
            "https" => Some(Self::Https),
            "ws" | "wss" => Some(Self::Websocket),
            _ => None,
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            "websocket" => Ok(Self::Websocket),
            other => Err(SchemaError::UnknownTransport(other.to_string())),
        }
    }
}

/// Launch descriptor for a local process (stdio transport)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StdioConfig {
    /// Command to execute
    pub command: String,

    /// Command arguments, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Environment variables (values may hold `${input:NAME}` placeholders)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,

    /// Working directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    /// Timeout in seconds; unset means no timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl StdioConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: IndexMap::new(),
            working_dir: None,
            timeout: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Connection descriptor for a network endpoint (http, https, websocket)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    /// Endpoint URL (may hold placeholders)
    pub url: String,

    /// Request headers (same placeholder convention as env)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,

    /// Timeout in seconds; unset means no timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: IndexMap::new(),
            timeout: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Transport-discriminated launch/connection descriptor.
///
/// The variant is the transport, so exactly one field group is ever
/// populated. On disk the discriminator is the `transport` key:
///
/// ```yaml
/// config:
///   transport: stdio
///   command: uv
///   args: [run, weather.py]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transport", rename_all = "lowercase")]
pub enum ServerConfig {
    Stdio(StdioConfig),
    Http(RemoteConfig),
    Https(RemoteConfig),
    Websocket(RemoteConfig),
}

impl ServerConfig {
    /// Build a remote descriptor. Fails for `stdio`, which has no URL group.
    pub fn remote(transport: TransportType, remote: RemoteConfig) -> Result<Self, SchemaError> {
        match transport {
            TransportType::Stdio => Err(SchemaError::WrongFieldGroup {
                transport: transport.to_string(),
                group: "url/headers",
            }),
            TransportType::Http => Ok(Self::Http(remote)),
            TransportType::Https => Ok(Self::Https(remote)),
            TransportType::Websocket => Ok(Self::Websocket(remote)),
        }
    }

    pub fn transport(&self) -> TransportType {
        match self {
            Self::Stdio(_) => TransportType::Stdio,
            Self::Http(_) => TransportType::Http,
            Self::Https(_) => TransportType::Https,
            Self::Websocket(_) => TransportType::Websocket,
        }
    }

    pub fn as_stdio(&self) -> Option<&StdioConfig> {
        match self {
            Self::Stdio(stdio) => Some(stdio),
            _ => None,
        }
    }

    pub fn as_remote(&self) -> Option<&RemoteConfig> {
        match self {
            Self::Stdio(_) => None,
            Self::Http(remote) | Self::Https(remote) | Self::Websocket(remote) => Some(remote),
        }
    }

    /// The launch command, if one is set (empty strings count as unset).
    pub fn command(&self) -> Option<&str> {
        self.as_stdio()
            .map(|s| s.command.as_str())
            .filter(|c| !c.trim().is_empty())
    }

    /// The endpoint URL, if one is set (empty strings count as unset).
    pub fn url(&self) -> Option<&str> {
        self.as_remote()
            .map(|r| r.url.as_str())
            .filter(|u| !u.trim().is_empty())
    }

    pub fn args(&self) -> &[String] {
        self.as_stdio().map(|s| s.args.as_slice()).unwrap_or(&[])
    }

    pub fn env(&self) -> Option<&IndexMap<String, String>> {
        self.as_stdio().map(|s| &s.env)
    }

    pub fn headers(&self) -> Option<&IndexMap<String, String>> {
        self.as_remote().map(|r| &r.headers)
    }

    pub fn timeout(&self) -> Option<u64> {
        match self {
            Self::Stdio(stdio) => stdio.timeout,
            Self::Http(remote) | Self::Https(remote) | Self::Websocket(remote) => remote.timeout,
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        match &mut self {
            Self::Stdio(stdio) => stdio.timeout = Some(seconds),
            Self::Http(remote) | Self::Https(remote) | Self::Websocket(remote) => {
                remote.timeout = Some(seconds)
            }
        }
        self
    }
}

impl From<StdioConfig> for ServerConfig {
    fn from(stdio: StdioConfig) -> Self {
        Self::Stdio(stdio)
    }
}
