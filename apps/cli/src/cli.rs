//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use mcpconf_core::{DeploymentType, Format, OnConflict};

#[derive(Parser)]
#[command(name = "mcpconf")]
#[command(version, about = "MCP server registry management")]
#[command(
    long_about = "Keeps a canonical registry of MCP server descriptions and converts \
entries to and from the formats other tools use.\n\n\
Environment Variables:\n\
  MCPCONF_REGISTRY   Registry file (default: mcp-registry.yaml)\n\
  MCPCONF_LOG_DIR    Also write daily-rotated log files to this directory\n\
  RUST_LOG           Log filter (default: warn,mcpconf_core=info)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Registry file path
    #[arg(short = 'r', long, global = true, value_name = "FILE")]
    pub registry: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List servers
    List {
        #[arg(long, value_enum)]
        deployment: Option<DeploymentArg>,
        /// Only members of this category
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive match on id, name and description
        #[arg(long)]
        query: Option<String>,
        /// Show detailed information
        #[arg(short, long)]
        detailed: bool,
    },
    /// Show server details
    Show {
        /// Server ID
        server: String,
    },
    /// Search servers, including declared tools and prompts
    Search { query: String },
    /// Convert a server to another format
    Convert {
        /// Server ID
        server: String,
        /// Target format
        #[arg(value_enum)]
        format: FormatArg,
        /// Write to a file instead of stdout (YAML for .yaml/.yml)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Validate one server or the whole registry
    Validate {
        /// Server ID (all servers when omitted)
        server: Option<String>,
    },
    /// List categories
    Categories,
    /// Import servers from another tool's configuration
    Import {
        /// Configuration file (defaults to the format's usual location)
        file: Option<PathBuf>,
        /// Source format (detected from the document when omitted)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
        /// What to do with ids that already exist
        #[arg(long, value_enum, default_value_t = ConflictArg::Skip)]
        on_conflict: ConflictArg,
        /// Save the registry after importing
        #[arg(long)]
        save: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeploymentArg {
    Local,
    Remote,
    Hybrid,
}

impl From<DeploymentArg> for DeploymentType {
    fn from(arg: DeploymentArg) -> Self {
        match arg {
            DeploymentArg::Local => DeploymentType::Local,
            DeploymentArg::Remote => DeploymentType::Remote,
            DeploymentArg::Hybrid => DeploymentType::Hybrid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Claude,
    Github,
    Dxt,
    Hosts,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Claude => Format::ClaudeDesktop,
            FormatArg::Github => Format::GithubMcp,
            FormatArg::Dxt => Format::Dxt,
            FormatArg::Hosts => Format::Hosts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConflictArg {
    Skip,
    Overwrite,
    Error,
}

impl From<ConflictArg> for OnConflict {
    fn from(arg: ConflictArg) -> Self {
        match arg {
            ConflictArg::Skip => OnConflict::Skip,
            ConflictArg::Overwrite => OnConflict::Overwrite,
            ConflictArg::Error => OnConflict::Error,
        }
    }
}
