//! Error taxonomy
//!
//! Structural problems fail fast (`SchemaError`, `ConversionError`), store
//! contract violations are `StoreError`. Semantic problems are not errors at
//! all: they are `ValidationIssue`s collected by the validator.

use std::path::PathBuf;
use thiserror::Error;

use crate::format::Format;

/// A structurally impossible construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown deployment type '{0}' (expected local, remote or hybrid)")]
    UnknownDeployment(String),

    #[error("unknown transport type '{0}' (expected stdio, http, https or websocket)")]
    UnknownTransport(String),

    /// A remote field group was requested for `stdio` (or the reverse).
    #[error("transport '{transport}' cannot carry the {group} field group")]
    WrongFieldGroup {
        transport: String,
        group: &'static str,
    },

    #[error("server id must not be empty")]
    EmptyId,
}

/// An adapter could not interpret a document or represent an entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{format} conversion failed at '{path}': {message}")]
pub struct ConversionError {
    /// Format the adapter speaks
    pub format: Format,
    /// Offending field path (document path on import, entry path on export)
    pub path: String,
    /// Human-readable reason
    pub message: String,
}

impl ConversionError {
    pub fn new(format: Format, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            format,
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Registry store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("server '{0}' already exists in the registry")]
    DuplicateId(String),

    #[error("server '{0}' not found")]
    NotFound(String),

    /// `add`/`update` was called with a key that differs from the entry's id.
    #[error("key '{key}' does not match entry id '{entry_id}'")]
    IdMismatch { key: String, entry_id: String },

    #[error("no registry path specified")]
    NoPath,

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("failed to access registry file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON registry: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML registry: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
