//! Per-entry rules. Each rule appends to the shared issue list.

use semver::{Version, VersionReq};
use std::collections::HashSet;

use super::{IssueCode, ValidationIssue};
use crate::domain::{contains_placeholder, DeploymentType, ServerEntry, TransportType};

pub(super) fn check_name(entry: &ServerEntry, issues: &mut Vec<ValidationIssue>) {
    if entry.name.trim().is_empty() {
        issues.push(ValidationIssue::new(
            IssueCode::MissingName,
            "name",
            "name is required",
        ));
    }
}

/// local needs a command and no URL, remote the reverse, hybrid at least one.
pub(super) fn check_deployment(entry: &ServerEntry, issues: &mut Vec<ValidationIssue>) {
    let command = entry.config.command();
    let url = entry.config.url();

    let problem = match entry.deployment {
        DeploymentType::Local if command.is_none() => Some((
            "config.command",
            "local deployment requires config.command",
        )),
        DeploymentType::Local if url.is_some() => {
            Some(("config.url", "local deployment must not set config.url"))
        }
        DeploymentType::Remote if url.is_none() => {
            Some(("config.url", "remote deployment requires config.url"))
        }
        DeploymentType::Remote if command.is_some() => Some((
            "config.command",
            "remote deployment must not set config.command",
        )),
        DeploymentType::Hybrid if command.is_none() && url.is_none() => Some((
            "config",
            "hybrid deployment requires config.command or config.url",
        )),
        _ => None,
    };

    if let Some((path, message)) = problem {
        issues.push(ValidationIssue::new(
            IssueCode::DeploymentConfigMismatch,
            path,
            format!("{} (transport is {})", message, entry.config.transport()),
        ));
    }
}

/// The URL of a remote transport must use that transport's scheme.
pub(super) fn check_transport(entry: &ServerEntry, issues: &mut Vec<ValidationIssue>) {
    let transport = entry.config.transport();

    if entry.config.timeout() == Some(0) {
        issues.push(ValidationIssue::new(
            IssueCode::ZeroTimeout,
            "config.timeout",
            "timeout of 0 seconds; omit the field for no timeout",
        ));
    }

    let Some(url) = entry.config.url() else {
        return;
    };

    let Some((scheme, _)) = url.split_once("://") else {
        if !contains_placeholder(url) {
            issues.push(ValidationIssue::new(
                IssueCode::InvalidUrl,
                "config.url",
                format!("'{}' is not an absolute URL", url),
            ));
        }
        return;
    };

    if contains_placeholder(scheme) {
        return;
    }

    if !transport
        .url_schemes()
        .iter()
        .any(|s| s.eq_ignore_ascii_case(scheme))
    {
        issues.push(ValidationIssue::new(
            IssueCode::TransportUrlMismatch,
            "config.url",
            format!(
                "transport {} expects a {} URL, got '{}'",
                transport,
                expected_schemes(transport),
                scheme
            ),
        ));
        return;
    }

    if !contains_placeholder(url) {
        if let Err(e) = url::Url::parse(url) {
            issues.push(ValidationIssue::new(
                IssueCode::InvalidUrl,
                "config.url",
                format!("'{}' is not a valid URL: {}", url, e),
            ));
        }
    }
}

fn expected_schemes(transport: TransportType) -> String {
    transport
        .url_schemes()
        .iter()
        .map(|s| format!("{}://", s))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Runtime and compatibility values must be parseable semver ranges.
pub(super) fn check_ranges(entry: &ServerEntry, issues: &mut Vec<ValidationIssue>) {
    if let Some(requirements) = &entry.requirements {
        for (runtime, range) in &requirements.runtimes {
            if let Err(e) = VersionReq::parse(range) {
                issues.push(ValidationIssue::new(
                    IssueCode::InvalidRuntimeRange,
                    format!("requirements.runtimes.{}", runtime),
                    format!("'{}' is not a valid version range: {}", range, e),
                ));
            }
        }
    }

    for (client, range) in &entry.compatibility {
        if let Err(e) = VersionReq::parse(range) {
            issues.push(ValidationIssue::new(
                IssueCode::InvalidCompatibilityRange,
                format!("compatibility.{}", client),
                format!("'{}' is not a valid version range: {}", range, e),
            ));
        }
    }
}

pub(super) fn check_metadata(entry: &ServerEntry, issues: &mut Vec<ValidationIssue>) {
    if let Some(version) = &entry.version {
        if Version::parse(version).is_err() {
            issues.push(ValidationIssue::new(
                IssueCode::InvalidVersion,
                "version",
                format!("'{}' is not a semantic version", version),
            ));
        }
    }

    if let Some(source_url) = &entry.source_url {
        if !contains_placeholder(source_url) && url::Url::parse(source_url).is_err() {
            issues.push(ValidationIssue::new(
                IssueCode::InvalidSourceUrl,
                "source_url",
                format!("'{}' is not a valid URL", source_url),
            ));
        }
    }
}

pub(super) fn check_security(entry: &ServerEntry, issues: &mut Vec<ValidationIssue>) {
    let Some(security) = &entry.security else {
        return;
    };
    for (index, permission) in security.permissions.iter().enumerate() {
        if permission.trim().is_empty() {
            issues.push(ValidationIssue::new(
                IssueCode::EmptyPermission,
                format!("security.permissions[{}]", index),
                "empty permission string",
            ));
        }
    }
}

pub(super) fn check_capabilities(entry: &ServerEntry, issues: &mut Vec<ValidationIssue>) {
    let Some(capabilities) = &entry.capabilities else {
        return;
    };
    let groups = [
        ("tools", &capabilities.tools),
        ("resources", &capabilities.resources),
        ("prompts", &capabilities.prompts),
    ];
    for (group, names) in groups {
        let mut seen = HashSet::new();
        for (index, name) in names.iter().enumerate() {
            if !seen.insert(name.as_str()) {
                issues.push(ValidationIssue::new(
                    IssueCode::DuplicateCapability,
                    format!("capabilities.{}[{}]", group, index),
                    format!("'{}' is declared more than once", name),
                ));
            }
        }
    }
}
