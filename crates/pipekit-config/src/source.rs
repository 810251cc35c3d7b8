//! Configuration source loading and composition

use crate::validation::Validate;
use crate::{ApplicationConfig, ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// A layer that can refine the configuration built so far
pub trait ConfigurationSource {
    /// Apply this source on top of `base`
    ///
    /// # Errors
    /// Returns configuration loading errors
    fn apply(&self, base: ApplicationConfig) -> ConfigResult<ApplicationConfig>;

    /// Get the name of this configuration source
    fn name(&self) -> &str;

    /// Get the priority of this source (higher number = applied later)
    fn priority(&self) -> u8;
}

/// Overrides from `PIPEKIT_*` environment variables
pub struct EnvironmentSource;

impl ConfigurationSource for EnvironmentSource {
    fn apply(&self, mut base: ApplicationConfig) -> ConfigResult<ApplicationConfig> {
        base.apply_env();
        Ok(base)
    }

    fn name(&self) -> &'static str {
        "environment"
    }

    fn priority(&self) -> u8 {
        100
    }
}

/// Partial configuration from a TOML file
///
/// Fields missing from the file keep the value they had in `base`.
pub struct TomlFileSource {
    path: PathBuf,
    required: bool,
}

impl TomlFileSource {
    /// An optional file: a missing file leaves the configuration unchanged
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required: false,
        }
    }

    /// A file that must exist
    pub fn required<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required: true,
        }
    }
}

impl ConfigurationSource for TomlFileSource {
    fn apply(&self, base: ApplicationConfig) -> ConfigResult<ApplicationConfig> {
        if !self.path.exists() {
            if self.required {
                return Err(ConfigError::FileNotFound {
                    path: self.path.clone(),
                });
            }
            return Ok(base);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let overrides: toml::Table = toml::from_str(&content)?;

        let mut merged = toml::Table::try_from(&base)?;
        merge_tables(&mut merged, overrides);

        let config: ApplicationConfig = merged.try_into()?;
        Ok(config)
    }

    fn name(&self) -> &'static str {
        "toml_file"
    }

    fn priority(&self) -> u8 {
        50
    }
}

/// Deep-merge `overrides` into `base`; nested tables merge key by key
fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        let toml::Value::Table(incoming) = value else {
            base.insert(key, value);
            continue;
        };
        if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
            merge_tables(existing, incoming);
            continue;
        }
        base.insert(key, toml::Value::Table(incoming));
    }
}

/// Type alias for configuration sources
type ConfigSources = Vec<Box<dyn ConfigurationSource>>;

/// Combines sources in priority order on top of the defaults
pub struct ConfigurationLoader {
    sources: ConfigSources,
}

impl ConfigurationLoader {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn add_source(mut self, source: Box<dyn ConfigurationSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Apply every source (lowest priority first) and validate the result
    ///
    /// # Errors
    /// Returns the first source failure or the validation error
    pub fn load(&self) -> ConfigResult<ApplicationConfig> {
        let mut config = ApplicationConfig::default();

        let mut sorted_sources = self.sources.iter().collect::<Vec<_>>();
        sorted_sources.sort_by_key(|source| source.priority());

        for source in sorted_sources {
            config = source.apply(config)?;
            tracing::debug!("Applied configuration source: {}", source.name());
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigurationLoader {
    fn default() -> Self {
        Self::new()
    }
}
