//! Tracing setup for the CLI.
//!
//! Console output goes to stderr so command output on stdout stays clean.
//! When a log directory is configured, a daily-rotated file is written there
//! as well.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_PREFIX: &str = "mcpconf";

/// Used when `RUST_LOG` is not set. Crate names use underscores here.
const DEFAULT_FILTER: &str = "warn,mcpconf_core=info";

/// Install the global subscriber. Keep the returned guard alive until exit,
/// or buffered file output is lost.
pub fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .compact()
        .with_line_number(false)
        .with_file(false)
        .with_target(false);

    let (file_layer, guard) = match log_dir.map(file_appender) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_line_number(true)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("Warning: file logging disabled: {}", e);
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

/// Files are named like `mcpconf.2026-10-18.log`.
fn file_appender(dir: &Path) -> Result<RollingFileAppender, String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("cannot create {}: {}", dir.display(), e))?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(dir)
        .map_err(|e| e.to_string())
}
