//! Tracing subscriber setup shared by the server and client binaries.

use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::time::file_stamp;

/// Errors raised while installing the global subscriber
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("failed to prepare log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// Console only
    Console,
    /// A timestamped file under `dir`, optionally mirrored to the console
    File { dir: PathBuf, console: bool },
}

fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Build the log file path for an application, e.g. `logs/server-20260101-093000.log`.
pub fn log_file_path(dir: &Path, app_name: &str) -> PathBuf {
    dir.join(format!("{app_name}-{}.log", file_stamp()))
}

fn open_log_file(path: &Path) -> Result<File, LoggerError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| LoggerError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggerError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Initialize logging for `app_name` with the given sink.
///
/// Returns the path of the log file when a file sink is used.
pub fn init_logger(
    app_name: &str,
    default_level: &str,
    sink: &LogSink,
) -> Result<Option<PathBuf>, LoggerError> {
    match sink {
        LogSink::Console => {
            tracing_subscriber::registry()
                .with(build_filter(default_level))
                .with(fmt::layer().with_target(false))
                .try_init()?;
            Ok(None)
        }
        LogSink::File { dir, console } => {
            let path = log_file_path(dir, app_name);
            let file = open_log_file(&path)?;

            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file));
            let console_layer = console.then(|| fmt::layer().with_target(false));

            tracing_subscriber::registry()
                .with(build_filter(default_level))
                .with(file_layer)
                .with(console_layer)
                .try_init()?;
            Ok(Some(path))
        }
    }
}
