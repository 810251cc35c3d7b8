//! Memory configuration records
//!
//! A memory is a named document collection. Its record lives next to the
//! documents as `memory.toml` and is always read and written as structured
//! data, never patched textually.

use crate::validation::{Validate, validate_non_empty};
use crate::{ConfigError, ConfigResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of a memory's configuration record
pub const MEMORY_CONFIG_FILE: &str = "memory.toml";

const MEMORY_NAME_MIN_LEN: usize = 3;
const MEMORY_NAME_MAX_LEN: usize = 50;

fn memory_name_regex() -> Option<&'static Regex> {
    static NAME_REGEX: std::sync::OnceLock<Option<Regex>> = std::sync::OnceLock::new();
    NAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9.-]+$").ok())
        .as_ref()
}

/// Check a memory name: 3-50 characters of letters, digits, dots and hyphens
///
/// # Errors
/// Returns `ConfigError::InvalidMemoryName` describing the violated rule
pub fn validate_memory_name(name: &str) -> ConfigResult<()> {
    let reject = |reason: &str| {
        Err(ConfigError::InvalidMemoryName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    let length = name.chars().count();
    if length < MEMORY_NAME_MIN_LEN {
        return reject("must be at least 3 characters long");
    }
    if length > MEMORY_NAME_MAX_LEN {
        return reject("must not exceed 50 characters");
    }

    let allowed = memory_name_regex().map_or_else(
        || {
            name.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        },
        |regex| regex.is_match(name),
    );
    if !allowed {
        return reject("can only contain letters, numbers, dots, and hyphens");
    }
    Ok(())
}

const fn default_gitignore() -> bool {
    true
}

/// Git tracking settings of a memory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitConfig {
    /// Build the memory from files in the git repository
    pub enabled: bool,

    /// Glob patterns of files included in the memory
    pub include: Vec<String>,

    /// Honour `.gitignore` when collecting files
    #[serde(default = "default_gitignore")]
    pub gitignore: bool,

    /// Commit hash last deployed
    #[serde(default)]
    pub deployed_at: String,

    /// Commit hash last embedded locally
    #[serde(default)]
    pub embedded_at: String,
}

impl GitConfig {
    /// Settings for a memory built from the `documents` directory
    pub fn documents_only() -> Self {
        Self {
            enabled: false,
            include: vec!["documents/**/*".to_string()],
            gitignore: false,
            deployed_at: String::new(),
            embedded_at: String::new(),
        }
    }

    /// Settings for a memory tracking the whole repository
    pub fn whole_repository() -> Self {
        Self {
            enabled: true,
            include: vec!["**/*".to_string()],
            gitignore: true,
            deployed_at: String::new(),
            embedded_at: String::new(),
        }
    }
}

impl Validate for GitConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.include.is_empty() {
            return Err(ConfigError::Generic {
                message: "At least one include pattern must be specified".to_string(),
            });
        }
        for pattern in &self.include {
            validate_non_empty(pattern, "git.include")?;
        }
        Ok(())
    }
}

/// A memory's configuration record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub git: GitConfig,
}

impl MemoryConfig {
    pub fn new(name: impl Into<String>, description: impl Into<String>, git: GitConfig) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            git,
        }
    }

    /// Read a record from disk
    ///
    /// # Errors
    /// Fails if the file is missing, unreadable or not a valid record
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate and write the record, creating parent directories
    ///
    /// # Errors
    /// Fails on validation, serialization or I/O errors
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Validate for MemoryConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_memory_name(&self.name)?;
        self.git.validate()
    }
}

/// Record `commit_hash` as the deployed commit of the memory stored at `path`
///
/// Only `git.deployed_at` changes. Nothing is written unless the existing
/// record loads and the updated one validates.
///
/// # Errors
/// Fails loudly on a missing or malformed record, a blank hash, or I/O errors
pub fn record_deployed_commit(path: &Path, commit_hash: &str) -> ConfigResult<MemoryConfig> {
    validate_non_empty(commit_hash, "deployed commit hash")?;

    let mut config = MemoryConfig::load(path)?;
    config.git.deployed_at = commit_hash.trim().to_string();
    config.save(path)?;

    tracing::info!(
        memory = %config.name,
        deployed_at = %config.git.deployed_at,
        "Updated deployed commit for memory"
    );
    Ok(config)
}
