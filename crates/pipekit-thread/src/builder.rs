//! Thread assembly

use crate::error::{CompositionError, THREAD_ERROR_MESSAGE, ThreadError};
use crate::few_shot::few_shot_messages;
use crate::message::Message;
use crate::pipe::Pipe;
use crate::similar::SimilarChunk;
use crate::system_prompt::system_prompt_message;
use crate::variables::{Variables, apply_variables, resolve_variables};
use pipekit_common::sanitize_with_message;

/// Build the ordered messages sent to the model for one run
///
/// The thread is the composed system prompt (if any), then the pipe's
/// few-shot examples, then the caller's messages as given. Variables are
/// substituted in every message afterwards.
///
/// # Errors
/// Returns `ThreadError::Internal` when the pipe cannot be composed into a
/// thread. The cause is logged with a correlation id; the error carries only
/// a fixed message and that id.
pub fn build_thread(
    pipe: &Pipe,
    messages: &[Message],
    similar_chunks: Option<&[SimilarChunk]>,
    variables: Option<&Variables>,
) -> Result<Vec<Message>, ThreadError> {
    compose(pipe, messages, similar_chunks, variables).map_err(|cause| {
        let sanitized = sanitize_with_message(
            &cause,
            &format!("build_thread pipe={}", pipe.name),
            THREAD_ERROR_MESSAGE,
        );
        ThreadError::Internal {
            message: sanitized.message,
            correlation_id: sanitized.correlation_id,
        }
    })
}

fn compose(
    pipe: &Pipe,
    messages: &[Message],
    similar_chunks: Option<&[SimilarChunk]>,
    variables: Option<&Variables>,
) -> Result<Vec<Message>, CompositionError> {
    if pipe.model_id().trim().is_empty() {
        return Err(CompositionError::BlankModel);
    }

    let system_prompt = system_prompt_message(pipe, similar_chunks)?;
    let examples = few_shot_messages(pipe)?;

    let mut thread = Vec::with_capacity(
        usize::from(system_prompt.is_some())
            .saturating_add(examples.len())
            .saturating_add(messages.len()),
    );
    thread.extend(system_prompt);
    thread.extend(examples);
    thread.extend_from_slice(messages);

    let variables = resolve_variables(pipe, variables);
    let thread = apply_variables(thread, &variables)?;

    tracing::debug!(
        pipe = %pipe.name,
        messages = thread.len(),
        variables = variables.len(),
        chunks = similar_chunks.map_or(0, <[SimilarChunk]>::len),
        "Built thread"
    );
    Ok(thread)
}
