//! Canonical on-disk form: the `Registry` document as YAML or JSON.

use std::path::Path;

use tracing::{debug, info};

use crate::domain::Registry;
use crate::error::StoreError;

/// Serialization used for a registry file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// YAML for `.yaml`/`.yml`, JSON for everything else.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    /// Parse registry text. Blank text is an empty registry.
    pub fn parse(&self, text: &str) -> Result<Registry, StoreError> {
        if text.trim().is_empty() {
            return Ok(Registry::new());
        }
        let registry = match self {
            Self::Json => serde_json::from_str(text)?,
            Self::Yaml => serde_yaml::from_str(text)?,
        };
        Ok(registry)
    }

    pub fn render(&self, registry: &Registry) -> Result<String, StoreError> {
        let mut text = match self {
            Self::Json => serde_json::to_string_pretty(registry)?,
            Self::Yaml => serde_yaml::to_string(registry)?,
        };
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }
}

pub(super) fn read_registry(path: &Path) -> Result<Registry, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let registry = DocumentFormat::from_path(path).parse(&content)?;
    info!(
        path = %path.display(),
        servers = registry.len(),
        "Loaded registry"
    );
    Ok(registry)
}

pub(super) fn write_registry(path: &Path, registry: &Registry) -> Result<(), StoreError> {
    let text = DocumentFormat::from_path(path).render(registry)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            debug!(dir = %parent.display(), "Creating registry directory");
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    std::fs::write(path, text).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        servers = registry.len(),
        "Saved registry"
    );
    Ok(())
}
