//! Registry store
//!
//! Owns one `Registry` and is the only place entries are added, replaced or
//! removed. Adapters and the validator only ever borrow from it.

mod persistence;

pub use persistence::DocumentFormat;

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::{DeploymentType, Registry, ServerEntry};
use crate::error::{ConversionError, StoreError};
use crate::format::{
    ClaudeDesktopAdapter, DxtAdapter, Format, FormatAdapter, GithubMcpAdapter, HostsAdapter,
};
use crate::validation::{validate_registry, RegistryReport};

/// Options recognized by [`RegistryStore::list`]. Unset options match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub deployment: Option<DeploymentType>,
    /// Restrict to members of this category
    pub category: Option<String>,
    /// Case-insensitive substring over id, name and description
    pub query: Option<String>,
}

impl ListFilter {
    fn matches(&self, entry: &ServerEntry, registry: &Registry) -> bool {
        if let Some(deployment) = self.deployment {
            if entry.deployment != deployment {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !registry.category(category).iter().any(|id| id == entry.id()) {
                return false;
            }
        }
        if let Some(query) = &self.query {
            if !entry.matches_query(query) {
                return false;
            }
        }
        true
    }
}

/// What to do when an imported id already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnConflict {
    /// Keep the existing entry
    #[default]
    Skip,
    /// Replace the existing entry in place
    Overwrite,
    /// Refuse the whole import and leave the registry untouched
    Error,
}

impl std::str::FromStr for OnConflict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "overwrite" => Ok(Self::Overwrite),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown conflict policy '{}' (expected skip, overwrite or error)",
                other
            )),
        }
    }
}

/// Result of [`RegistryStore::import_from`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub added: Vec<String>,
    pub overwritten: Vec<String>,
    pub skipped: Vec<String>,
    /// Entries the adapter could not convert
    pub errors: Vec<ConversionError>,
}

impl ImportReport {
    /// Number of entries written to the registry
    pub fn changed(&self) -> usize {
        self.added.len() + self.overwritten.len()
    }
}

/// An exported document: JSON for the structured formats, a single line for
/// hosts-line.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportedDocument {
    Json(Value),
    Line(String),
}

impl fmt::Display for ExportedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => {
                let text = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                f.write_str(&text)
            }
            Self::Line(line) => f.write_str(line),
        }
    }
}

/// In-memory registry, optionally bound to a file
#[derive(Debug, Clone, Default)]
pub struct RegistryStore {
    registry: Registry,
    path: Option<PathBuf>,
}

impl RegistryStore {
    /// Empty registry not bound to any file
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_registry(registry: Registry) -> Self {
        Self {
            registry,
            path: None,
        }
    }

    /// Load `path`. Fails if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let registry = persistence::read_registry(path)?;
        Ok(Self {
            registry,
            path: Some(path.to_path_buf()),
        })
    }

    /// Load `path` if it exists, otherwise start empty bound to it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        debug!(path = %path.display(), "Registry file not found, starting empty");
        Ok(Self {
            registry: Registry::new(),
            path: Some(path.to_path_buf()),
        })
    }

    /// Write back to the bound file
    pub fn save(&self) -> Result<(), StoreError> {
        let path = self.path.as_deref().ok_or(StoreError::NoPath)?;
        persistence::write_registry(path, &self.registry)
    }

    /// Write to `path` and bind the store to it
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        persistence::write_registry(path, &self.registry)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.registry.servers.contains_key(id)
    }

    fn check_key(id: &str, entry: &ServerEntry) -> Result<(), StoreError> {
        if entry.id() != id {
            return Err(StoreError::IdMismatch {
                key: id.to_string(),
                entry_id: entry.id().to_string(),
            });
        }
        Ok(())
    }

    /// Add a new entry. Fails if `id` is already present.
    pub fn add(&mut self, id: &str, entry: ServerEntry) -> Result<(), StoreError> {
        Self::check_key(id, &entry)?;
        if self.contains(id) {
            return Err(StoreError::DuplicateId(id.to_string()));
        }
        self.registry.servers.insert(id.to_string(), entry);
        info!(server_id = %id, "Added server");
        Ok(())
    }

    /// Replace an existing entry, keeping its position.
    pub fn update(&mut self, id: &str, entry: ServerEntry) -> Result<(), StoreError> {
        Self::check_key(id, &entry)?;
        let slot = self
            .registry
            .servers
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        *slot = entry;
        info!(server_id = %id, "Updated server");
        Ok(())
    }

    /// Remove an entry and return it. Category references are left as they
    /// are; the validator reports them as dangling.
    pub fn remove(&mut self, id: &str) -> Result<ServerEntry, StoreError> {
        let entry = self
            .registry
            .servers
            .shift_remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        info!(server_id = %id, "Removed server");
        Ok(entry)
    }

    pub fn get(&self, id: &str) -> Result<&ServerEntry, StoreError> {
        self.registry
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Entries matching `filter`, in insertion order
    pub fn list(&self, filter: &ListFilter) -> Vec<&ServerEntry> {
        self.registry
            .servers
            .values()
            .filter(|entry| filter.matches(entry, &self.registry))
            .collect()
    }

    /// Like a `query` filter, but also matches declared capability names.
    pub fn search(&self, query: &str) -> Vec<&ServerEntry> {
        let query_lower = query.to_lowercase();
        self.registry
            .servers
            .values()
            .filter(|entry| {
                entry.matches_query(query)
                    || entry
                        .capabilities
                        .as_ref()
                        .map(|caps| caps.names().any(|n| n.to_lowercase().contains(&query_lower)))
                        .unwrap_or(false)
            })
            .collect()
    }

    pub fn categories(&self) -> &IndexMap<String, Vec<String>> {
        &self.registry.categories
    }

    /// Add `id` to `category`, creating the category if needed.
    pub fn add_to_category(&mut self, category: &str, id: &str) -> Result<(), StoreError> {
        if !self.contains(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let members = self
            .registry
            .categories
            .entry(category.to_string())
            .or_default();
        if !members.iter().any(|m| m == id) {
            members.push(id.to_string());
            debug!(server_id = %id, category = %category, "Added server to category");
        }
        Ok(())
    }

    /// Remove `id` from `category`. An emptied category is dropped.
    /// Returns whether anything was removed.
    pub fn remove_from_category(&mut self, category: &str, id: &str) -> bool {
        let Some(members) = self.registry.categories.get_mut(category) else {
            return false;
        };
        let before = members.len();
        members.retain(|m| m != id);
        let removed = members.len() != before;
        if members.is_empty() {
            self.registry.categories.shift_remove(category);
        }
        removed
    }

    /// Export one entry through the adapter for `format`.
    pub fn export(&self, format: Format, id: &str) -> Result<ExportedDocument, StoreError> {
        let entry = self.get(id)?;
        let document = match format {
            Format::ClaudeDesktop => ExportedDocument::Json(ClaudeDesktopAdapter.export(entry)?),
            Format::GithubMcp => ExportedDocument::Json(GithubMcpAdapter.export(entry)?),
            Format::Dxt => ExportedDocument::Json(DxtAdapter.export(entry)?),
            Format::Hosts => ExportedDocument::Line(HostsAdapter.export(entry)?),
        };
        Ok(document)
    }

    /// Import every entry `document` describes.
    ///
    /// Entries the adapter cannot convert are reported in the returned
    /// [`ImportReport`] and do not stop the rest. With [`OnConflict::Error`]
    /// any clash, including a repeated id within the document, fails the
    /// whole import before anything is written.
    pub fn import_from<A: FormatAdapter>(
        &mut self,
        adapter: &A,
        document: &A::Document,
        on_conflict: OnConflict,
    ) -> Result<ImportReport, StoreError> {
        let batch = adapter.import_batch(document)?;

        if on_conflict == OnConflict::Error {
            let mut seen: Vec<&str> = Vec::with_capacity(batch.entries.len());
            for entry in &batch.entries {
                if self.contains(entry.id()) || seen.contains(&entry.id()) {
                    warn!(server_id = %entry.id(), format = %adapter.format(), "Import refused: id already exists");
                    return Err(StoreError::DuplicateId(entry.id().to_string()));
                }
                seen.push(entry.id());
            }
        }

        let mut report = ImportReport {
            errors: batch.errors,
            ..ImportReport::default()
        };
        for entry in batch.entries {
            let id = entry.id().to_string();
            match self.registry.servers.get_mut(&id) {
                Some(existing) => match on_conflict {
                    OnConflict::Overwrite => {
                        *existing = entry;
                        debug!(server_id = %id, "Overwrote existing server");
                        report.overwritten.push(id);
                    }
                    OnConflict::Skip | OnConflict::Error => {
                        debug!(server_id = %id, "Skipped existing server");
                        report.skipped.push(id);
                    }
                },
                None => {
                    self.registry.servers.insert(id.clone(), entry);
                    report.added.push(id);
                }
            }
        }

        info!(
            format = %adapter.format(),
            added = report.added.len(),
            overwritten = report.overwritten.len(),
            skipped = report.skipped.len(),
            failed = report.errors.len(),
            "Import complete"
        );
        Ok(report)
    }

    /// Validate the whole registry
    pub fn validate(&self) -> RegistryReport {
        validate_registry(&self.registry)
    }
}
