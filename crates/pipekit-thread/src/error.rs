//! Error types for pipe loading and thread assembly

use pipekit_common::{CommonError, CorrelationId, define_error_enum, impl_common_conversions};
use thiserror::Error;

define_error_enum! {
    /// Errors raised while loading a pipe definition
    pub enum PipeError {
        #[error("Invalid pipe: {0}")]
        InvalidPipe(String),
    }
}

impl_common_conversions!(PipeError, with_serde);

impl From<toml::de::Error> for PipeError {
    fn from(e: toml::de::Error) -> Self {
        Self::parse_error(format!("TOML: {e}"))
    }
}

/// Why a thread could not be composed; only ever logged
#[derive(Debug, Error)]
pub(crate) enum CompositionError {
    #[error("pipe declares {count} unnamed system prompts, expected at most one")]
    MultipleSystemPrompts { count: usize },

    #[error("few-shot message {index} uses the tool role")]
    ToolFewShot { index: usize },

    #[error("pipe model id is blank")]
    BlankModel,

    #[error("variable pattern failed to compile: {0}")]
    Pattern(String),
}

/// Fixed text returned to callers when a thread cannot be built
pub const THREAD_ERROR_MESSAGE: &str =
    "Something unexpected happened. Error generating thread of messages.";

/// Error returned by [`build_thread`](crate::build_thread)
///
/// The cause is logged under `correlation_id` and never exposed.
#[derive(Debug, Error)]
pub enum ThreadError {
    #[error("{message}")]
    Internal {
        message: String,
        correlation_id: CorrelationId,
    },
}

impl ThreadError {
    /// Machine readable code for API layers
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }
}
