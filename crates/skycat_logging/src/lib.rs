//! Shared logging setup for skycat binaries.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "skycat=info,skycat_catalog=info";

/// Logging configuration for one binary.
pub struct LogConfig<'a> {
    /// Base name of the log file (`<app_name>.log.<date>`)
    pub app_name: &'a str,
    /// Mirror the file filter on stderr instead of warnings only
    pub verbose: bool,
    /// Directory for daily log files; `None` disables file logging
    pub log_dir: Option<PathBuf>,
}

/// Keeps the background file writer alive. Drop it last.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize tracing with a daily rolling file writer and stderr output.
///
/// `RUST_LOG` overrides the default filter. A log directory that cannot be
/// created downgrades to stderr-only logging with a warning.
pub fn init_logging(config: LogConfig<'_>) -> Result<LogGuard> {
    let file_filter = default_filter();
    let console_filter = if config.verbose {
        default_filter()
    } else {
        EnvFilter::new("warn")
    };

    let mut guard = None;
    let file_layer = match config.log_dir.as_deref().map(ensure_dir).transpose() {
        Ok(Some(dir)) => {
            let appender = tracing_appender::rolling::daily(dir, format!("{}.log", config.app_name));
            let (writer, worker) = tracing_appender::non_blocking(appender);
            guard = Some(worker);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_filter(file_filter),
            )
        }
        Ok(None) => None,
        Err(err) => {
            eprintln!("Warning: file logging disabled: {:#}", err);
            None
        }
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LogGuard { _file: guard })
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Ensure the log directory exists.
pub fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    Ok(dir.to_path_buf())
}
