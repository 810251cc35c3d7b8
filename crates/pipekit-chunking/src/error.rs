//! Error types for the chunking crate

use thiserror::Error;

/// Chunking-specific error types
///
/// Oversized chunks are not errors; they surface as
/// [`ChunkWarning`](crate::ChunkWarning)s in the report.
#[derive(Error, Debug)]
pub enum ChunkingError {
    /// Invalid size or overlap settings
    #[error("Invalid chunking configuration: {0}")]
    Configuration(String),

    /// A language preset name that is not known
    #[error("Language not supported: {0}")]
    LanguageUnsupported(String),

    /// The tokenizer for a length counter could not be loaded
    #[error("Token counting error: {0}")]
    TokenCounting(String),
}

impl ChunkingError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn token_counting(msg: impl Into<String>) -> Self {
        Self::TokenCounting(msg.into())
    }
}

/// Result type alias for chunking operations
pub type ChunkingResult<T> = Result<T, ChunkingError>;
