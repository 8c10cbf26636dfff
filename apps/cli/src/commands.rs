//! Command handlers. The CLI does the text parsing and printing; everything
//! else goes through the core's `RegistryStore`.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use mcpconf_core::{
    validate_entry, ClaudeDesktopAdapter, DocumentFormat, DxtAdapter, ExportedDocument, Format,
    GithubMcpAdapter, HostsAdapter, ImportReport, ListFilter, OnConflict, RegistryStore,
    ServerEntry, ValidationIssue,
};
use serde_json::Value;
use tracing::debug;

use crate::cli::Commands;
use crate::config::Settings;

pub fn run(command: Commands, settings: &Settings) -> Result<ExitCode> {
    let path = settings.registry_path.as_path();
    match command {
        Commands::List {
            deployment,
            category,
            query,
            detailed,
        } => {
            let store = load(path)?;
            let filter = ListFilter {
                deployment: deployment.map(Into::into),
                category,
                query,
            };
            list(&store.list(&filter), detailed);
        }
        Commands::Show { server } => {
            let store = load(path)?;
            println!("{}", format_detail(store.get(&server)?));
        }
        Commands::Search { query } => {
            let store = load(path)?;
            let results = store.search(&query);
            if results.is_empty() {
                println!("No servers found matching '{}'.", query);
            } else {
                println!("Found {} servers:", results.len());
                list(&results, false);
            }
        }
        Commands::Convert {
            server,
            format,
            output,
        } => {
            let store = load(path)?;
            let document = store.export(format.into(), &server)?;
            match output {
                Some(output) => {
                    fs::write(&output, render_document(&document, &output)?)
                        .with_context(|| format!("Failed to write {}", output.display()))?;
                    println!("Configuration written to {}", output.display());
                }
                None => println!("{}", document),
            }
        }
        Commands::Validate { server } => {
            let store = load(path)?;
            return validate(&store, server.as_deref());
        }
        Commands::Categories => {
            let store = load(path)?;
            if store.categories().is_empty() {
                println!("No categories defined.");
            }
            for (category, members) in store.categories() {
                println!("{}: {}", category, members.join(", "));
            }
        }
        Commands::Import {
            file,
            format,
            on_conflict,
            save,
        } => {
            let format: Option<Format> = format.map(Into::into);
            let file = match file.or_else(|| format.and_then(|f| f.default_path())) {
                Some(file) => file,
                None => bail!("No configuration file given and the format has no default location"),
            };

            let mut store = RegistryStore::open(path)?;
            let report = import_file(&mut store, &file, format, on_conflict.into())?;
            print_import_report(&report);
            if save {
                store.save()?;
                println!("Imported {} servers and saved to registry.", report.changed());
            } else {
                println!(
                    "Imported {} servers (not saved, use --save to persist).",
                    report.changed()
                );
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn load(path: &Path) -> Result<RegistryStore> {
    RegistryStore::load(path).with_context(|| format!("Failed to load registry {}", path.display()))
}

fn list(entries: &[&ServerEntry], detailed: bool) {
    if entries.is_empty() {
        println!("No servers found.");
        return;
    }
    if detailed {
        let details: Vec<String> = entries.iter().map(|e| format_detail(e)).collect();
        println!("{}", details.join("\n\n"));
        return;
    }
    println!("{:<20} {:<8} {:<10} DESCRIPTION", "NAME", "DEPLOY", "TRANSPORT");
    println!("{}", "-".repeat(70));
    for entry in entries {
        println!("{}", format_row(entry));
    }
}

pub(crate) fn format_row(entry: &ServerEntry) -> String {
    format!(
        "{:<20} {:<8} {:<10} {}",
        entry.id(),
        entry.deployment.as_str(),
        entry.config.transport().as_str(),
        entry.description.as_deref().unwrap_or("")
    )
}

pub(crate) fn format_detail(entry: &ServerEntry) -> String {
    let mut lines = vec![
        format!("Server: {}", entry.id()),
        format!("Name: {}", entry.name),
    ];
    if let Some(description) = &entry.description {
        lines.push(format!("Description: {}", description));
    }
    if let Some(version) = &entry.version {
        lines.push(format!("Version: {}", version));
    }
    lines.push(format!("Deployment: {}", entry.deployment));
    lines.push(format!("Transport: {}", entry.config.transport()));
    if let Some(license) = &entry.license {
        lines.push(format!("License: {}", license));
    }
    if let Some(source_url) = &entry.source_url {
        lines.push(format!("Source: {}", source_url));
    }

    lines.push(String::new());
    lines.push("Configuration:".to_string());
    if let Some(command) = entry.config.command() {
        lines.push(format!("  Command: {}", command));
    }
    if !entry.config.args().is_empty() {
        lines.push(format!("  Args: {}", entry.config.args().join(" ")));
    }
    if let Some(url) = entry.config.url() {
        lines.push(format!("  URL: {}", url));
    }
    if let Some(env) = entry.config.env().filter(|env| !env.is_empty()) {
        lines.push("  Environment:".to_string());
        for (key, value) in env {
            lines.push(format!("    {}: {}", key, value));
        }
    }
    if let Some(headers) = entry.config.headers().filter(|h| !h.is_empty()) {
        lines.push("  Headers:".to_string());
        for (key, value) in headers {
            lines.push(format!("    {}: {}", key, value));
        }
    }

    if let Some(capabilities) = entry.capabilities.as_ref().filter(|c| !c.is_empty()) {
        lines.push(String::new());
        lines.push("Capabilities:".to_string());
        for (label, names) in [
            ("Tools", &capabilities.tools),
            ("Resources", &capabilities.resources),
            ("Prompts", &capabilities.prompts),
        ] {
            if !names.is_empty() {
                lines.push(format!("  {}: {}", label, names.join(", ")));
            }
        }
    }

    if let Some(requirements) = entry.requirements.as_ref().filter(|r| !r.is_empty()) {
        lines.push(String::new());
        lines.push("Requirements:".to_string());
        if !requirements.platforms.is_empty() {
            lines.push(format!("  Platforms: {}", requirements.platforms.join(", ")));
        }
        for (runtime, range) in &requirements.runtimes {
            lines.push(format!("  {}: {}", runtime, range));
        }
    }

    lines.join("\n")
}

fn validate(store: &RegistryStore, server: Option<&str>) -> Result<ExitCode> {
    let (issues, errors): (Vec<(Option<String>, ValidationIssue)>, usize) = match server {
        Some(id) => {
            let issues = validate_entry(store.get(id)?);
            let errors = issues.iter().filter(|i| i.is_error()).count();
            (issues.into_iter().map(|i| (Some(id.to_string()), i)).collect(), errors)
        }
        None => {
            let report = store.validate();
            let issues = report
                .issues()
                .map(|(id, issue)| (id.map(str::to_string), issue.clone()))
                .collect();
            (issues, report.error_count())
        }
    };

    for (id, issue) in &issues {
        match id {
            Some(id) => println!("{}: {}", id, issue),
            None => println!("registry: {}", issue),
        }
    }

    let warnings = issues.len() - errors;
    match (server, issues.is_empty()) {
        (Some(id), true) => println!("Server '{}' is valid.", id),
        (None, true) => println!("All servers are valid."),
        _ => println!("{} error(s), {} warning(s)", errors, warnings),
    }

    Ok(if errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn import_file(
    store: &mut RegistryStore,
    file: &Path,
    format: Option<Format>,
    on_conflict: OnConflict,
) -> Result<ImportReport> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read configuration file {}", file.display()))?;

    let structured = format.map_or_else(|| is_structured_path(file), |f| f.is_structured());
    if !structured {
        debug!(file = %file.display(), "Importing hosts-line document");
        return Ok(store.import_from(&HostsAdapter, &text, on_conflict)?);
    }

    let document = parse_document(&text, file)?;
    let format = match format {
        Some(format) => format,
        None => detect_format(&document)
            .ok_or_else(|| anyhow!("Cannot detect the format of {}; pass --format", file.display()))?,
    };
    debug!(file = %file.display(), format = %format, "Importing document");

    let report = match format {
        Format::ClaudeDesktop => store.import_from(&ClaudeDesktopAdapter, &document, on_conflict)?,
        Format::GithubMcp => store.import_from(&GithubMcpAdapter, &document, on_conflict)?,
        Format::Dxt => store.import_from(&DxtAdapter, &document, on_conflict)?,
        Format::Hosts => store.import_from(&HostsAdapter, &text, on_conflict)?,
    };
    Ok(report)
}

fn is_structured_path(file: &Path) -> bool {
    matches!(
        file.extension().and_then(|e| e.to_str()),
        Some("json") | Some("yaml") | Some("yml")
    )
}

/// Parse JSON or YAML text into a JSON value for the adapters.
pub(crate) fn parse_document(text: &str, file: &Path) -> Result<Value> {
    let value = match DocumentFormat::from_path(file) {
        DocumentFormat::Yaml => serde_yaml::from_str(text)
            .with_context(|| format!("Invalid YAML in {}", file.display()))?,
        DocumentFormat::Json => serde_json::from_str(text)
            .with_context(|| format!("Invalid JSON in {}", file.display()))?,
    };
    Ok(value)
}

/// Guess a structured format from its top-level keys.
pub(crate) fn detect_format(document: &Value) -> Option<Format> {
    let object = document.as_object()?;
    if object.contains_key("mcpServers") {
        Some(Format::ClaudeDesktop)
    } else if object.contains_key("dxt_version") || object.contains_key("server") {
        Some(Format::Dxt)
    } else if object.contains_key("servers") {
        Some(Format::GithubMcp)
    } else {
        None
    }
}

fn render_document(document: &ExportedDocument, output: &Path) -> Result<String> {
    let text = match document {
        ExportedDocument::Json(value) => match DocumentFormat::from_path(output) {
            DocumentFormat::Yaml => serde_yaml::to_string(value)?,
            DocumentFormat::Json => format!("{}\n", serde_json::to_string_pretty(value)?),
        },
        ExportedDocument::Line(line) => format!("{}\n", line),
    };
    Ok(text)
}

fn print_import_report(report: &ImportReport) {
    for id in &report.skipped {
        println!("Skipped '{}': already in registry", id);
    }
    for id in &report.overwritten {
        println!("Overwrote '{}'", id);
    }
    for error in &report.errors {
        eprintln!("Could not import: {}", error);
    }
}
