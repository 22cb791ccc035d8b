//! Tracing helpers shared by binaries: env filter and a non-blocking log file writer.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

pub const ENV_LOG_FILE: &str = "LOG_FILE";

/// `RUST_LOG` when set and valid, else `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// `LOG_FILE` when set and non-empty.
pub fn log_file_path() -> Option<PathBuf> {
    std::env::var_os(ENV_LOG_FILE)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Opens `path` for appending (creating parent dirs) behind a background writer.
/// Keep the guard alive until exit so buffered lines are flushed.
pub fn file_writer(path: &Path) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(tracing_appender::non_blocking(file))
}
