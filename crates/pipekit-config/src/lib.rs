//! Centralized configuration for pipekit
//!
//! Every section has safe defaults (constants below), can be partially
//! overridden from a TOML file, and finally by `PIPEKIT_*` environment
//! variables. Validation runs once the layers are combined.

pub mod error;
pub mod memory;
pub mod source;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use memory::{GitConfig, MemoryConfig, record_deployed_commit, validate_memory_name};
pub use source::{ConfigurationLoader, ConfigurationSource, EnvironmentSource, TomlFileSource};
pub use validation::Validate;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

// =============================================================================
// SAFE DEFAULTS
// =============================================================================

// Chunking
const DEFAULT_CHUNK_MAX_LENGTH: usize = 10_000;
const DEFAULT_CHUNK_OVERLAP: usize = 1_000;

// Pipe API client
const DEFAULT_CLIENT_BASE_URL: &str = "http://localhost:9000";
const DEFAULT_CLIENT_TIMEOUT_SECONDS: u64 = 60;

// Logging
const DEFAULT_LOG_ENABLED: bool = true;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_JSON: bool = false;
const DEFAULT_LOG_SENSITIVE_DATA: bool = false;

// Memory
const DEFAULT_MEMORY_DIR: &str = "pipekit/memory";

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Optional `.env` file loaded before environment overrides
    pub env_file: Option<String>,

    /// Text chunking limits for memory documents
    pub chunking: ChunkingConfig,

    /// Pipe API client settings
    pub client: ClientConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Memory settings
    pub memory: MemorySettings,
}

impl ApplicationConfig {
    /// Defaults overridden by any `PIPEKIT_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields whose environment variable is set
    pub fn apply_env(&mut self) {
        self.chunking.apply_env();
        self.client.apply_env();
        self.logging.apply_env();
        self.memory.apply_env();
        if let Some(path) = env_string("PIPEKIT_ENV_FILE") {
            self.env_file = Some(path);
        }
    }
}

impl Validate for ApplicationConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.chunking.validate()?;
        self.client.validate()?;
        self.logging.validate()?;
        self.memory.validate()?;
        Ok(())
    }
}

/// Chunk size limits, measured by the splitter's length function
/// (characters by default)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Upper bound on a chunk's length
    pub chunk_max_length: usize,

    /// Length carried over from the end of one chunk into the next
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_max_length: DEFAULT_CHUNK_MAX_LENGTH,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkingConfig {
    pub const fn new(chunk_max_length: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_max_length,
            chunk_overlap,
        }
    }

    /// Load configuration from environment variables with safe defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Some(max_length) = env_parse("PIPEKIT_CHUNK_MAX_LENGTH") {
            self.chunk_max_length = max_length;
        }
        if let Some(overlap) = env_parse("PIPEKIT_CHUNK_OVERLAP") {
            self.chunk_overlap = overlap;
        }
    }
}

impl Validate for ChunkingConfig {
    fn validate(&self) -> ConfigResult<()> {
        // Also rejects a zero maximum, since any overlap is >= 0
        if self.chunk_overlap >= self.chunk_max_length {
            return Err(ConfigError::InvalidChunking {
                max_length: self.chunk_max_length,
                overlap: self.chunk_overlap,
            });
        }
        Ok(())
    }
}

/// Pipe API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the pipe API
    pub base_url: String,

    /// API key sent as a bearer token
    pub api_key: Option<String>,

    /// Provider key forwarded in the `LB-LLM-Key` header
    pub llm_key: Option<String>,

    /// Request timeout in seconds (0 disables the timeout)
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CLIENT_BASE_URL.to_string(),
            api_key: None,
            llm_key: None,
            timeout_seconds: DEFAULT_CLIENT_TIMEOUT_SECONDS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with safe defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Some(base_url) = env_string("PIPEKIT_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(api_key) = env_string("PIPEKIT_API_KEY") {
            self.api_key = Some(api_key);
        }
        if let Some(llm_key) = env_string("PIPEKIT_LLM_KEY") {
            self.llm_key = Some(llm_key);
        }
        if let Some(timeout) = env_parse("PIPEKIT_TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout;
        }
    }

    /// Safe description for logs (no keys)
    pub fn safe_description(&self) -> String {
        format!(
            "{} (api key: {}, llm key: {})",
            self.base_url,
            if self.api_key.is_some() { "set" } else { "unset" },
            if self.llm_key.is_some() { "set" } else { "unset" },
        )
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_url(&self.base_url)?;
        validation::validate_range(self.timeout_seconds, 0, 3600, "client.timeout_seconds")?;
        if let Some(key) = &self.api_key {
            validation::validate_non_empty(key, "client.api_key")?;
        }
        Ok(())
    }
}

/// Which pipe lifecycle events get logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogCategories {
    pub pipe: bool,
    pub pipe_completion: bool,
    pub pipe_request: bool,
    pub pipe_response: bool,
    pub tool: bool,
    pub memory: bool,
}

impl Default for LogCategories {
    fn default() -> Self {
        Self {
            pipe: true,
            pipe_completion: true,
            pipe_request: true,
            pipe_response: true,
            tool: false,
            memory: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Master switch for pipe/memory event logging
    pub enabled: bool,

    /// Include message contents and request bodies in logs
    pub log_sensitive_data: bool,

    /// Default level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON lines instead of human-readable output
    pub json: bool,

    /// Also write rotating log files into this directory
    pub log_dir: Option<String>,

    /// Per-event toggles
    pub categories: LogCategories,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_LOG_ENABLED,
            log_sensitive_data: DEFAULT_LOG_SENSITIVE_DATA,
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: DEFAULT_LOG_JSON,
            log_dir: None,
            categories: LogCategories::default(),
        }
    }
}

impl LoggingConfig {
    /// Load configuration from environment variables with safe defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Some(enabled) = env_parse("PIPEKIT_LOG_ENABLED") {
            self.enabled = enabled;
        }
        if let Some(sensitive) = env_parse("PIPEKIT_LOG_SENSITIVE_DATA") {
            self.log_sensitive_data = sensitive;
        }
        if let Some(level) = env_string("PIPEKIT_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(json) = env_parse("PIPEKIT_LOG_JSON") {
            self.json = json;
        }
        if let Some(dir) = env_string("PIPEKIT_LOG_DIR") {
            self.log_dir = Some(dir);
        }
    }

    /// Whether an event in `category` should be logged at all
    pub const fn should_log(&self, category: LogCategory) -> bool {
        if !self.enabled {
            return false;
        }
        match category {
            LogCategory::Pipe => self.categories.pipe,
            LogCategory::PipeCompletion => self.categories.pipe_completion,
            LogCategory::PipeRequest => self.categories.pipe_request,
            LogCategory::PipeResponse => self.categories.pipe_response,
            LogCategory::Tool => self.categories.tool,
            LogCategory::Memory => self.categories.memory,
        }
    }

    /// Log directory as a path, if configured
    pub fn log_dir_path(&self) -> Option<PathBuf> {
        self.log_dir.as_ref().map(PathBuf::from)
    }

    /// Platform cache location for log files
    pub fn default_log_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("pipekit")
            .join("logs")
    }
}

/// Event categories toggled by [`LogCategories`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Pipe,
    PipeCompletion,
    PipeRequest,
    PipeResponse,
    Tool,
    Memory,
}

impl Validate for LoggingConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Generic {
                    message: format!("Invalid tracing level: {}", self.level),
                });
            }
        }
        if let Some(dir) = &self.log_dir {
            validation::validate_non_empty(dir, "logging.log_dir")?;
        }
        Ok(())
    }
}

/// Memory settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    /// Directory holding one sub-directory per memory
    pub memory_dir: String,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            memory_dir: DEFAULT_MEMORY_DIR.to_string(),
        }
    }
}

impl MemorySettings {
    fn apply_env(&mut self) {
        if let Some(dir) = env_string("PIPEKIT_MEMORY_DIR") {
            self.memory_dir = dir;
        }
    }

    /// Path of the configuration record for memory `name`
    pub fn memory_config_path(&self, name: &str) -> PathBuf {
        PathBuf::from(&self.memory_dir)
            .join(name)
            .join(memory::MEMORY_CONFIG_FILE)
    }
}

impl Validate for MemorySettings {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_non_empty(&self.memory_dir, "memory.memory_dir")
    }
}
