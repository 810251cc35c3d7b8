//! Pipekit thread crate
//!
//! Pipe definitions and assembly of the message thread sent to a model:
//! system prompt composition with retrieved context, few-shot examples,
//! caller messages and prompt variable substitution.

mod builder;
pub mod error;
mod few_shot;
pub mod message;
pub mod pipe;
pub mod similar;
pub mod system_prompt;
pub mod variables;

pub use builder::build_thread;
pub use error::{PipeError, THREAD_ERROR_MESSAGE, ThreadError};
pub use few_shot::{EXAMPLE_ASSISTANT_NAME, EXAMPLE_USER_NAME};
pub use message::{Message, Role};
pub use pipe::{Pipe, PipeMemory, PipeVariable};
pub use similar::SimilarChunk;
pub use variables::{Variables, resolve_variables};
