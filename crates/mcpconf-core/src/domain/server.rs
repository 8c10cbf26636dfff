use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ServerConfig;
use crate::error::SchemaError;

/// Where a server runs relative to its consumer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentType {
    /// Launched by the consumer through a command
    Local,
    /// Hosted elsewhere, reached through a URL
    Remote,
    /// Either; the adapter decides which launch path wins
    Hybrid,
}

impl DeploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for DeploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(SchemaError::UnknownDeployment(other.to_string())),
        }
    }
}

/// Declared capabilities. Descriptive only, never checked against a live server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Capabilities {
    /// Tool names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,

    /// Resource URI patterns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,

    /// Prompt names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prompts: Vec<String>,
}

impl Capabilities {
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.resources.is_empty() && self.prompts.is_empty()
    }

    /// All declared names, tools first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools
            .iter()
            .chain(&self.resources)
            .chain(&self.prompts)
            .map(String::as_str)
    }
}

/// Platform and runtime requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,

    /// Runtime name to semver range (e.g. `python: ">=3.10"`)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub runtimes: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Whether the server needs network access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<bool>,
}

impl Requirements {
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
            && self.runtimes.is_empty()
            && self.dependencies.is_empty()
            && self.network.is_none()
    }
}

/// Security flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Security {
    #[serde(default)]
    pub requires_auth: bool,

    /// Capability strings such as `network.http` or `fs.read:/path`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,

    #[serde(default)]
    pub sandbox: bool,
}

/// A value the consumer is prompted for, referenced as `${input:ID}`.
///
/// Hints are metadata. The core never materializes them into env or headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputHint {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the value is a secret (masked when prompted)
    #[serde(default)]
    pub password: bool,

    #[serde(default)]
    pub required: bool,
}

impl InputHint {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            password: false,
            required: false,
        }
    }
}

/// Canonical description of one MCP server.
///
/// The id is the registry key. It is fixed at construction and is not part of
/// the serialized body in the keyed `servers` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    #[serde(default, skip_serializing)]
    pub(crate) id: String,

    /// Human-readable display name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Server version (semver)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    /// Source repository URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    pub deployment: DeploymentType,

    pub config: ServerConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Security>,

    /// Client/tool name to semver range
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub compatibility: IndexMap<String, String>,

    /// Prompted values referenced by placeholders
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputHint>,
}

impl ServerEntry {
    /// Create an entry with only the mandatory fields set.
    ///
    /// No defaults are filled in and no semantic rule is checked here: a
    /// local entry with a URL config is accepted and left for the validator.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        deployment: DeploymentType,
        config: impl Into<ServerConfig>,
    ) -> Result<Self, SchemaError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SchemaError::EmptyId);
        }
        Ok(Self {
            id,
            name: name.into(),
            description: None,
            version: None,
            license: None,
            source_url: None,
            author: None,
            deployment,
            config: config.into(),
            capabilities: None,
            requirements: None,
            security: None,
            compatibility: IndexMap::new(),
            inputs: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    pub fn with_requirements(mut self, requirements: Requirements) -> Self {
        self.requirements = Some(requirements);
        self
    }

    pub fn with_security(mut self, security: Security) -> Self {
        self.security = Some(security);
        self
    }

    pub fn with_compatibility(mut self, client: impl Into<String>, range: impl Into<String>) -> Self {
        self.compatibility.insert(client.into(), range.into());
        self
    }

    pub fn with_inputs(mut self, inputs: Vec<InputHint>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Check if this server declares an authentication requirement
    pub fn requires_auth(&self) -> bool {
        self.security.as_ref().map(|s| s.requires_auth).unwrap_or(false)
    }

    pub fn is_sandboxed(&self) -> bool {
        self.security.as_ref().map(|s| s.sandbox).unwrap_or(false)
    }

    /// Case-insensitive substring match over id, name and description.
    pub fn matches_query(&self, query: &str) -> bool {
        let query_lower = query.to_lowercase();
        self.id.to_lowercase().contains(&query_lower)
            || self.name.to_lowercase().contains(&query_lower)
            || self
                .description
                .as_ref()
                .map(|d| d.to_lowercase().contains(&query_lower))
                .unwrap_or(false)
    }
}
