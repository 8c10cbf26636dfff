//! # mcpconf Core Library
//!
//! Canonical description of MCP servers and the conversions between it and
//! the vendor formats that describe the same servers.
//!
//! ## Modules
//!
//! - `domain` - Schema model (ServerEntry, ServerConfig, Registry)
//! - `validation` - Semantic checks that collect issues instead of failing
//! - `format` - Adapters for Claude Desktop, GitHub MCP, DXT and hosts-line
//! - `store` - Registry store (add/remove/query/import) and persistence
//! - `error` - Error taxonomy shared by the modules above
//!
//! Nothing in this crate resolves `${input:..}` or `${env:..}` placeholders,
//! launches servers or touches the network.

pub mod domain;
pub mod error;
pub mod format;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use domain::*;
pub use error::{ConversionError, SchemaError, StoreError};
pub use format::{
    ClaudeDesktopAdapter, DxtAdapter, Format, FormatAdapter, GithubMcpAdapter, HostsAdapter,
    ImportBatch,
};
pub use store::{
    DocumentFormat, ExportedDocument, ImportReport, ListFilter, OnConflict, RegistryStore,
};
pub use validation::{
    validate_entry, validate_registry, IssueCode, RegistryReport, Severity, ValidationIssue,
};
