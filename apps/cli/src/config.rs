//! CLI settings: command-line flag, then environment (including `.env`),
//! then built-in defaults.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Registry file used when nothing else is configured
pub const DEFAULT_REGISTRY: &str = "mcp-registry.yaml";

pub const REGISTRY_ENV: &str = "MCPCONF_REGISTRY";
pub const LOG_DIR_ENV: &str = "MCPCONF_LOG_DIR";

#[derive(Debug, Error)]
pub enum SettingsError {
    /// Environment variable contained a value that cannot be used.
    #[error("Invalid value for environment variable {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Canonical registry file (YAML for .yaml/.yml, JSON otherwise)
    pub registry_path: PathBuf,
    /// Directory for daily-rotated log files; console only when unset
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    /// Read settings from the process environment. Call `dotenvy::dotenv()`
    /// first so a `.env` file can supply the variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        let log_dir = load_env_optional(LOG_DIR_ENV).map(PathBuf::from);
        if let Some(dir) = &log_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(SettingsError::InvalidValue {
                    key: LOG_DIR_ENV,
                    reason: format!("{} is not a directory", dir.display()),
                });
            }
        }

        Ok(Self {
            registry_path: load_env_optional(REGISTRY_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REGISTRY)),
            log_dir,
        })
    }

    /// Apply the `--registry` flag, which wins over the environment.
    pub fn with_registry(mut self, registry: Option<PathBuf>) -> Self {
        if let Some(path) = registry {
            self.registry_path = path;
        }
        self
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
