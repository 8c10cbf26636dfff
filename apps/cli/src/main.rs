//! mcpconf: manage a registry of MCP server descriptions.

mod cli;
mod commands;
mod config;
mod logging;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use cli::Args;
use config::Settings;

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Load .env file if present
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?.with_registry(args.registry);

    let _guard = logging::init_tracing(settings.log_dir.as_deref());
    tracing::debug!(registry = %settings.registry_path.display(), "Using registry");

    commands::run(args.command, &settings)
}
