//! Semantic validation
//!
//! Validation never stops at the first problem: every rule runs and every
//! issue is returned with its field path and a stable code, so callers can
//! report (or filter) all of them in one pass. Whether errors block
//! persistence is the caller's decision.

mod rules;

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::domain::{Registry, ServerEntry, REGISTRY_SCHEMA_VERSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// Machine-readable issue code. The string form is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    MissingName,
    DeploymentConfigMismatch,
    InvalidUrl,
    TransportUrlMismatch,
    ZeroTimeout,
    InvalidRuntimeRange,
    InvalidCompatibilityRange,
    InvalidVersion,
    InvalidSourceUrl,
    EmptyPermission,
    DuplicateCapability,
    EntryIdMismatch,
    DuplicateId,
    UnsupportedRegistryVersion,
    UnknownRegistryMinorVersion,
    InvalidRegistryVersion,
    CategoryUnknownServer,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingName => "MISSING_NAME",
            Self::DeploymentConfigMismatch => "DEPLOYMENT_CONFIG_MISMATCH",
            Self::InvalidUrl => "INVALID_URL",
            Self::TransportUrlMismatch => "TRANSPORT_URL_MISMATCH",
            Self::ZeroTimeout => "ZERO_TIMEOUT",
            Self::InvalidRuntimeRange => "INVALID_RUNTIME_RANGE",
            Self::InvalidCompatibilityRange => "INVALID_COMPATIBILITY_RANGE",
            Self::InvalidVersion => "INVALID_VERSION",
            Self::InvalidSourceUrl => "INVALID_SOURCE_URL",
            Self::EmptyPermission => "EMPTY_PERMISSION",
            Self::DuplicateCapability => "DUPLICATE_CAPABILITY",
            Self::EntryIdMismatch => "ENTRY_ID_MISMATCH",
            Self::DuplicateId => "DUPLICATE_ID",
            Self::UnsupportedRegistryVersion => "UNSUPPORTED_REGISTRY_VERSION",
            Self::UnknownRegistryMinorVersion => "UNKNOWN_REGISTRY_MINOR_VERSION",
            Self::InvalidRegistryVersion => "INVALID_REGISTRY_VERSION",
            Self::CategoryUnknownServer => "CATEGORY_UNKNOWN_SERVER",
        }
    }

    /// Severity every issue with this code is reported at
    pub fn severity(&self) -> Severity {
        match self {
            Self::ZeroTimeout
            | Self::InvalidVersion
            | Self::InvalidSourceUrl
            | Self::EmptyPermission
            | Self::DuplicateCapability
            | Self::UnknownRegistryMinorVersion
            | Self::CategoryUnknownServer => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One semantic problem found by the validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Dotted field path, e.g. `requirements.runtimes.python`
    pub path: String,
    pub message: String,
    pub code: IssueCode,
}

impl ValidationIssue {
    pub fn new(code: IssueCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            path: path.into(),
            message: message.into(),
            code,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}: {}", self.severity, self.code, self.path, self.message)
    }
}

/// Result of validating a whole registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryReport {
    /// Issues that belong to no single entry (version, categories)
    pub registry: Vec<ValidationIssue>,
    /// Issues per entry id, one slot for every entry in listing order
    pub servers: IndexMap<String, Vec<ValidationIssue>>,
}

impl RegistryReport {
    /// Every issue, paired with the entry id it belongs to (if any)
    pub fn issues(&self) -> impl Iterator<Item = (Option<&str>, &ValidationIssue)> {
        self.registry.iter().map(|i| (None, i)).chain(
            self.servers
                .iter()
                .flat_map(|(id, issues)| issues.iter().map(move |i| (Some(id.as_str()), i))),
        )
    }

    pub fn error_count(&self) -> usize {
        self.issues().filter(|(_, i)| i.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues().filter(|(_, i)| !i.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Validate one entry in isolation.
pub fn validate_entry(entry: &ServerEntry) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    rules::check_name(entry, &mut issues);
    rules::check_deployment(entry, &mut issues);
    rules::check_transport(entry, &mut issues);
    rules::check_ranges(entry, &mut issues);
    rules::check_metadata(entry, &mut issues);
    rules::check_security(entry, &mut issues);
    rules::check_capabilities(entry, &mut issues);
    issues
}

/// Validate every entry plus the registry-wide rules.
pub fn validate_registry(registry: &Registry) -> RegistryReport {
    let mut report = RegistryReport {
        registry: check_version(&registry.version),
        servers: IndexMap::new(),
    };

    let mut seen_ids = HashSet::new();
    for (key, entry) in &registry.servers {
        let mut issues = validate_entry(entry);
        if entry.id() != key {
            issues.push(ValidationIssue::new(
                IssueCode::EntryIdMismatch,
                "id",
                format!("entry stored under '{}' carries id '{}'", key, entry.id()),
            ));
        }
        if !seen_ids.insert(entry.id()) {
            issues.push(ValidationIssue::new(
                IssueCode::DuplicateId,
                "id",
                format!("id '{}' is used by more than one entry", entry.id()),
            ));
        }
        report.servers.insert(key.clone(), issues);
    }

    for (category, members) in &registry.categories {
        for (index, id) in members.iter().enumerate() {
            if !registry.servers.contains_key(id) {
                report.registry.push(ValidationIssue::new(
                    IssueCode::CategoryUnknownServer,
                    format!("categories.{}[{}]", category, index),
                    format!("category '{}' references unknown server '{}'", category, id),
                ));
            }
        }
    }

    report
}

fn check_version(version: &str) -> Vec<ValidationIssue> {
    let supported = parse_major_minor(REGISTRY_SCHEMA_VERSION);
    match (parse_major_minor(version), supported) {
        (Some((major, _)), Some((supported_major, _))) if major != supported_major => {
            vec![ValidationIssue::new(
                IssueCode::UnsupportedRegistryVersion,
                "version",
                format!(
                    "registry version '{}' is not supported (expected {})",
                    version, REGISTRY_SCHEMA_VERSION
                ),
            )]
        }
        (Some((_, minor)), Some((_, supported_minor))) if minor != supported_minor => {
            vec![ValidationIssue::new(
                IssueCode::UnknownRegistryMinorVersion,
                "version",
                format!(
                    "registry version '{}' is newer or older than {}; unknown fields may be ignored",
                    version, REGISTRY_SCHEMA_VERSION
                ),
            )]
        }
        (Some(_), _) => Vec::new(),
        (None, _) => vec![ValidationIssue::new(
            IssueCode::InvalidRegistryVersion,
            "version",
            format!("registry version '{}' is not of the form MAJOR.MINOR", version),
        )],
    }
}

fn parse_major_minor(version: &str) -> Option<(u64, u64)> {
    let mut parts = version.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = match parts.next() {
        Some(minor) => minor.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor))
}
