//! Structured logging setup shared by the binaries
//!
//! Output always goes to stderr (stdout is reserved for command results).
//! An optional log directory adds a daily-rotated file sink.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

/// How the global subscriber should be built
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
    /// Directory for a rotating log file, if any
    pub log_dir: Option<PathBuf>,
    /// Log file name prefix inside `log_dir`
    pub file_name: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            log_dir: None,
            file_name: "pipekit.log".to_string(),
        }
    }
}

/// Logging setup failures
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {path}: {source}")]
    LogDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to install global subscriber: {0}")]
    Install(String),
}

/// Keeps the non-blocking writers flushing; drop it only at shutdown.
#[must_use = "dropping the guard stops log output"]
pub struct LoggingGuard {
    _guards: Vec<WorkerGuard>,
}

/// Install the global `tracing` subscriber.
///
/// # Errors
/// Returns `LoggingError` if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init_logging(options: &LogOptions) -> Result<LoggingGuard, LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&options.level));

    let (stderr_writer, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    let mut guards = vec![stderr_guard];

    let writer = match &options.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::LogDir {
                path: dir.clone(),
                source,
            })?;
            let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, &options.file_name);
            let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
            guards.push(file_guard);
            BoxMakeWriter::new(file_writer.and(stderr_writer))
        }
        None => BoxMakeWriter::new(stderr_writer),
    };

    let installed = if options.json {
        tracing_subscriber::fmt()
            .json()
            .with_writer(writer)
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_writer(writer)
            .with_env_filter(filter)
            .try_init()
    };
    installed.map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(LoggingGuard { _guards: guards })
}
