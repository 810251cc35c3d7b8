//! Pipe definitions
//!
//! A pipe bundles a model, its generation settings and the prompt messages
//! (system prompt, safety prompt, retrieval prompt override and few-shot
//! examples) that every run starts from. Definitions are stored as JSON or
//! TOML.

use crate::error::{PipeError, Result};
use crate::message::Message;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_MODEL: &str = "openai:gpt-4o-mini";

/// A default value for a prompt variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipeVariable {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// A memory the pipe retrieves context from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipeMemory {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pipe {
    pub name: String,
    pub description: String,
    /// `provider:model-id`
    pub model: String,
    pub stream: bool,
    pub json: bool,
    pub store: bool,
    pub moderate: bool,
    pub top_p: f32,
    pub max_tokens: u32,
    pub temperature: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    pub stop: Vec<String>,
    pub messages: Vec<Message>,
    pub variables: Vec<PipeVariable>,
    pub memory: Vec<PipeMemory>,
}

impl Default for Pipe {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            model: DEFAULT_MODEL.to_string(),
            stream: true,
            json: false,
            store: true,
            moderate: true,
            top_p: 1.0,
            max_tokens: 1000,
            temperature: 0.7,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            stop: Vec::new(),
            messages: Vec::new(),
            variables: Vec::new(),
            memory: Vec::new(),
        }
    }
}

impl Pipe {
    /// Parse a JSON pipe definition
    ///
    /// # Errors
    /// Returns `PipeError::Parse` for malformed JSON and
    /// `PipeError::InvalidPipe` when the definition has no name
    pub fn from_json_str(content: &str) -> Result<Self> {
        let pipe: Self = serde_json::from_str(content)?;
        pipe.check()?;
        Ok(pipe)
    }

    /// Parse a TOML pipe definition
    ///
    /// # Errors
    /// Returns `PipeError::Parse` for malformed TOML and
    /// `PipeError::InvalidPipe` when the definition has no name
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let pipe: Self = toml::from_str(content)?;
        pipe.check()?;
        Ok(pipe)
    }

    /// Load a pipe from a `.json` or `.toml` file
    ///
    /// # Errors
    /// Returns `PipeError::Io` when the file cannot be read,
    /// `PipeError::Configuration` for an unknown extension, and parse errors
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Err(PipeError::Configuration(format!(
                "Unsupported pipe file format: {}",
                path.display()
            ))),
        }
    }

    fn check(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PipeError::InvalidPipe("pipe name must not be blank".to_string()));
        }
        Ok(())
    }

    /// Provider part of the model id, if present
    pub fn provider(&self) -> Option<&str> {
        self.model.split_once(':').map(|(provider, _)| provider)
    }

    /// Model part of the model id
    pub fn model_id(&self) -> &str {
        self.model
            .split_once(':')
            .map_or(self.model.as_str(), |(_, model)| model)
    }

    pub fn has_memory(&self) -> bool {
        !self.memory.is_empty()
    }
}
