//! Few-shot examples declared by a pipe

use crate::error::CompositionError;
use crate::message::{Message, Role};
use crate::pipe::Pipe;

pub const EXAMPLE_USER_NAME: &str = "example_user";
pub const EXAMPLE_ASSISTANT_NAME: &str = "example_assistant";

/// Few-shot messages in declared order, unmodified
///
/// A message is an example when it is named `example_user` or
/// `example_assistant`, or when it is a plain user or assistant message.
/// Other named system messages (safety, rag) belong to the system prompt.
pub(crate) fn few_shot_messages(pipe: &Pipe) -> Result<Vec<Message>, CompositionError> {
    let mut examples = Vec::new();

    for (index, message) in pipe.messages.iter().enumerate() {
        let named_example = matches!(
            message.name(),
            Some(EXAMPLE_USER_NAME | EXAMPLE_ASSISTANT_NAME)
        );

        match message.role {
            Role::Tool => return Err(CompositionError::ToolFewShot { index }),
            Role::User | Role::Assistant => examples.push(message.clone()),
            Role::System if named_example => examples.push(message.clone()),
            Role::System => {}
        }
    }

    Ok(examples)
}
