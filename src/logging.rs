//! Diagnostics logging to a file
//!
//! The terminal belongs to the dashboard, so `tracing` output goes to a log
//! file under the platform data directory (`~/.local/share/weatherdash/` on
//! Linux) unless `--log-file` names another path. The level defaults to
//! `info` and can be overridden through `RUST_LOG`.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "weatherdash.log";

/// Error types for logging setup
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Could not determine a log directory; pass --log-file")]
    NoLogDirectory,

    #[error("Failed to open log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Default log file location, if the platform has a data directory
pub fn default_log_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "weatherdash")?;
    Some(project_dirs.data_local_dir().join(LOG_FILE_NAME))
}

/// Opens a log file for appending, creating missing parent directories
pub fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    let io_error = |source| LoggingError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error)
}

/// Installs the global subscriber writing to `log_file` or the default path
///
/// # Returns
/// The path of the log file in use
pub fn init(log_file: Option<&Path>) -> Result<PathBuf, LoggingError> {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => default_log_path().ok_or(LoggingError::NoLogDirectory)?,
    };
    let file = open_log_file(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(path)
}
