//! Format adapters
//!
//! Converts between the canonical `ServerEntry` and the formats other tools
//! use to describe the same servers:
//! - Claude Desktop (`claude_desktop_config.json`)
//! - GitHub MCP / VS Code (`mcp.json` with `servers` + `inputs`)
//! - DXT manifest (`manifest.json`)
//! - hosts-line (one compact line per server)
//!
//! Adapters consume and produce already-parsed documents. They never read
//! files, never resolve placeholders and never default a structurally
//! required field: a missing `command` is a `ConversionError`, not a guess.

mod claude_desktop;
mod dxt;
mod fields;
mod github_mcp;
mod hosts;

pub use claude_desktop::ClaudeDesktopAdapter;
pub use dxt::{DxtAdapter, DXT_VERSION};
pub use github_mcp::GithubMcpAdapter;
pub use hosts::HostsAdapter;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::ServerEntry;
use crate::error::ConversionError;

/// External format identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    ClaudeDesktop,
    GithubMcp,
    Dxt,
    Hosts,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::ClaudeDesktop, Format::GithubMcp, Format::Dxt, Format::Hosts];

    /// Short name used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::ClaudeDesktop => "claude",
            Format::GithubMcp => "github",
            Format::Dxt => "dxt",
            Format::Hosts => "hosts",
        }
    }

    /// Whether documents of this format are JSON-shaped (vs. plain lines)
    pub fn is_structured(&self) -> bool {
        !matches!(self, Format::Hosts)
    }

    /// Get default config file path for this format, if the format has one
    pub fn default_path(&self) -> Option<PathBuf> {
        match self {
            Format::ClaudeDesktop => {
                #[cfg(target_os = "macos")]
                {
                    dirs::home_dir().map(|h| {
                        h.join("Library")
                            .join("Application Support")
                            .join("Claude")
                            .join("claude_desktop_config.json")
                    })
                }
                #[cfg(not(target_os = "macos"))]
                {
                    dirs::config_dir().map(|c| c.join("Claude").join("claude_desktop_config.json"))
                }
            }
            Format::GithubMcp => Some(PathBuf::from(".vscode").join("mcp.json")),
            Format::Dxt => Some(PathBuf::from("manifest.json")),
            Format::Hosts => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::ClaudeDesktop => "Claude Desktop",
            Format::GithubMcp => "GitHub MCP",
            Format::Dxt => "DXT manifest",
            Format::Hosts => "hosts-line",
        };
        f.write_str(name)
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "claude" | "claude-desktop" => Ok(Format::ClaudeDesktop),
            "github" | "github-mcp" | "vscode" => Ok(Format::GithubMcp),
            "dxt" => Ok(Format::Dxt),
            "hosts" => Ok(Format::Hosts),
            other => Err(format!(
                "unknown format '{}' (expected claude, github, dxt or hosts)",
                other
            )),
        }
    }
}

/// Outcome of importing one document.
///
/// Entries that convert are kept; entries that fail are reported without
/// stopping the rest of the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportBatch {
    pub entries: Vec<ServerEntry>,
    pub errors: Vec<ConversionError>,
}

impl ImportBatch {
    fn push(&mut self, result: Result<ServerEntry, ConversionError>) {
        match result {
            Ok(entry) => {
                tracing::debug!(server_id = entry.id(), "Imported server entry");
                self.entries.push(entry);
            }
            Err(e) => {
                tracing::warn!(path = %e.path, error = %e.message, "Skipped unconvertible entry");
                self.errors.push(e);
            }
        }
    }
}

/// Two-way conversion between `ServerEntry` and one external format.
pub trait FormatAdapter {
    /// Parsed document type (a JSON value, or text lines for hosts-line)
    type Document;

    fn format(&self) -> Format;

    /// Import every entry the document describes, collecting per-entry
    /// failures. Fails only when the document shape itself is wrong.
    fn import_batch(&self, document: &Self::Document) -> Result<ImportBatch, ConversionError>;

    /// Export a single entry. Fails fast on the first field the format
    /// cannot represent.
    fn export(&self, entry: &ServerEntry) -> Result<Self::Document, ConversionError>;

    /// Strict import: the first per-entry failure fails the whole document.
    fn import(&self, document: &Self::Document) -> Result<Vec<ServerEntry>, ConversionError> {
        let batch = self.import_batch(document)?;
        match batch.errors.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(batch.entries),
        }
    }
}

/// Display name derived from an id: `weather-local` becomes `Weather Local`.
pub(crate) fn display_name_from_id(id: &str) -> String {
    let mut name = String::with_capacity(id.len());
    let mut previous_alpha = false;
    for ch in id.replace('-', " ").chars() {
        if ch.is_alphabetic() {
            if previous_alpha {
                name.extend(ch.to_lowercase());
            } else {
                name.extend(ch.to_uppercase());
            }
            previous_alpha = true;
        } else {
            name.push(ch);
            previous_alpha = false;
        }
    }
    name
}
