//! File logging setup

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// Log file used when `--log-file` is not given
pub const DEFAULT_LOG_FILE: &str = "downloader.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Subscriber appending timestamped, leveled lines to `path`.
///
/// `RUST_LOG` overrides the default `info` level.
pub fn file_subscriber(path: &Path) -> Result<impl Subscriber + Send + Sync> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .finish())
}

/// Route `tracing` events for the whole process into `path`
pub fn init_file_logging(path: &Path) -> Result<()> {
    tracing::subscriber::set_global_default(file_subscriber(path)?)
        .context("Failed to install log subscriber")
}
