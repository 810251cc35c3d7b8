//! Configuration loading for the CLI

// Internal imports (std, crate)
use pipekit_common::{LogOptions, initialize_environment};
use pipekit_config::{
    ApplicationConfig, ConfigurationLoader, EnvironmentSource, LoggingConfig, TomlFileSource,
};
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use anyhow::Context;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "pipekit.toml";

/// Names a `.env` file to load instead of searching the working directory
const ENV_FILE_VAR: &str = "PIPEKIT_ENV_FILE";

/// Log file name inside the log directory
const LOG_FILE_NAME: &str = "pipekit.log";

/// Load `.env`, then defaults < TOML file < environment
///
/// An explicit `config_file` must exist; the default `pipekit.toml` is optional.
/// `PIPEKIT_ENV_FILE` names a `.env` file to use instead of discovery.
pub fn load(config_file: Option<&Path>) -> anyhow::Result<ApplicationConfig> {
    let env_file = std::env::var_os(ENV_FILE_VAR).map(PathBuf::from);
    initialize_environment(env_file.as_deref());

    let file_source = match config_file {
        Some(path) => TomlFileSource::required(path),
        None => TomlFileSource::new(DEFAULT_CONFIG_FILE),
    };

    ConfigurationLoader::new()
        .add_source(Box::new(file_source))
        .add_source(Box::new(EnvironmentSource))
        .load()
        .context("Failed to load configuration")
}

/// Subscriber options for `logging`
///
/// `log_dir` overrides the configured directory; `file_logs` falls back to the
/// platform log directory when neither is set.
pub fn log_options(logging: &LoggingConfig, log_dir: Option<PathBuf>, file_logs: bool) -> LogOptions {
    let level = if logging.enabled {
        logging.level.clone()
    } else {
        "warn".to_string()
    };

    LogOptions {
        level,
        json: logging.json,
        log_dir: log_dir
            .or_else(|| logging.log_dir_path())
            .or_else(|| file_logs.then(LoggingConfig::default_log_dir)),
        file_name: LOG_FILE_NAME.to_string(),
    }
}
