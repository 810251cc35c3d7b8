//! System prompt composition
//!
//! The composed prompt is the primary system prompt, the safety prompt and
//! the JSON-mode instructions, in that order and separated by blank lines.
//! Pipes with memory also get a context slot filled with retrieved chunks.

use crate::error::CompositionError;
use crate::message::{Message, Role};
use crate::pipe::Pipe;
use crate::similar::SimilarChunk;

/// Placeholder replaced by retrieved context when present in the prompt
pub const CONTEXT_PLACEHOLDER: &str = "{{context}}";

/// Name of the system message holding the safety prompt
pub const SAFETY_PROMPT_NAME: &str = "safety";

/// Name of the system message overriding [`DEFAULT_RAG_PROMPT`]
pub const RAG_PROMPT_NAME: &str = "rag";

pub const DEFAULT_RAG_PROMPT: &str = "Below is some CONTEXT for you to answer the questions. \
ONLY answer from the CONTEXT. CONTEXT consists of multiple information chunks. \
Each chunk has a source mentioned at the end.\n\n\
For each piece of response you provide, cite the source in brackets like so: [1].\n\n\
At the end of the answer, always list each source with its corresponding number and \
provide the document name. like so [1] Filename.doc.\n\n\
If you don't know the answer, just say that you don't know. \
Ask for more context and better questions if needed.";

pub const JSON_MODE_PROMPT: &str = "Respond only with a single valid JSON value. \
Do not wrap it in markdown code fences and do not add any text before or after it.";

const CHUNK_DIVIDER: &str = "\n\n-------------\n\n";

fn named_system_prompt<'a>(pipe: &'a Pipe, name: &str) -> Option<&'a str> {
    pipe.messages
        .iter()
        .find(|message| message.role == Role::System && message.name() == Some(name))
        .map(|message| message.content.as_str())
        .filter(|content| !content.trim().is_empty())
}

/// Render retrieved chunks, numbered from 1, each followed by its source
pub fn render_context(similar_chunks: &[SimilarChunk]) -> String {
    (1..)
        .zip(similar_chunks)
        .map(|(number, chunk)| {
            format!(
                "{}\n\nSource: {} [{number}]",
                chunk.content.trim(),
                chunk.source()
            )
        })
        .collect::<Vec<_>>()
        .join(CHUNK_DIVIDER)
}

/// Compose the single system message of a thread, if there is anything to say
pub(crate) fn system_prompt_message(
    pipe: &Pipe,
    similar_chunks: Option<&[SimilarChunk]>,
) -> Result<Option<Message>, CompositionError> {
    let primary: Vec<&Message> = pipe
        .messages
        .iter()
        .filter(|message| message.role == Role::System && message.name.is_none())
        .collect();
    if primary.len() > 1 {
        return Err(CompositionError::MultipleSystemPrompts {
            count: primary.len(),
        });
    }

    let mut sections: Vec<&str> = Vec::new();
    if let Some(prompt) = primary.first().map(|message| message.content.as_str()) {
        sections.push(prompt);
    }
    if let Some(safety) = named_system_prompt(pipe, SAFETY_PROMPT_NAME) {
        sections.push(safety);
    }
    if pipe.json {
        sections.push(JSON_MODE_PROMPT);
    }
    sections.retain(|section| !section.trim().is_empty());
    let mut prompt = sections.join("\n\n");

    if pipe.has_memory() {
        let context = render_context(similar_chunks.unwrap_or_default());
        if prompt.contains(CONTEXT_PLACEHOLDER) {
            prompt = prompt.replace(CONTEXT_PLACEHOLDER, &context);
        } else {
            let rag_prompt =
                named_system_prompt(pipe, RAG_PROMPT_NAME).unwrap_or(DEFAULT_RAG_PROMPT);
            if !prompt.is_empty() {
                prompt.push_str("\n\n");
            }
            prompt.push_str(rag_prompt);
            prompt.push_str("\n\nCONTEXT:\n");
            prompt.push_str(&context);
        }
    }

    if prompt.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(Message::system(prompt)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipe::PipeMemory;

    fn pipe_with(messages: Vec<Message>) -> Pipe {
        Pipe {
            name: "test".to_string(),
            messages,
            ..Pipe::default()
        }
    }

    fn memory() -> Vec<PipeMemory> {
        vec![PipeMemory {
            name: "docs".to_string(),
        }]
    }

    #[test]
    fn test_sections_in_order() {
        let mut pipe = pipe_with(vec![
            Message::system("Be safe.").with_name(SAFETY_PROMPT_NAME),
            Message::system("You are helpful."),
        ]);
        pipe.json = true;

        let message = system_prompt_message(&pipe, None)
            .expect("composes")
            .expect("has prompt");
        assert_eq!(
            message.content,
            format!("You are helpful.\n\nBe safe.\n\n{JSON_MODE_PROMPT}")
        );
    }

    #[test]
    fn test_no_prompt_no_memory_yields_nothing() {
        let pipe = pipe_with(vec![Message::user("example")]);
        assert_eq!(system_prompt_message(&pipe, None).expect("composes"), None);
    }

    #[test]
    fn test_context_placeholder_is_replaced() {
        let mut pipe = pipe_with(vec![Message::system("Answer from:\n{{context}}\nThanks.")]);
        pipe.memory = memory();
        let chunks = [SimilarChunk::new("Rust is fast.").with_document("rust.md")];

        let message = system_prompt_message(&pipe, Some(&chunks))
            .expect("composes")
            .expect("has prompt");
        assert_eq!(
            message.content,
            "Answer from:\nRust is fast.\n\nSource: rust.md [1]\nThanks."
        );
    }

    #[test]
    fn test_rag_prompt_appended_without_placeholder() {
        let mut pipe = pipe_with(vec![
            Message::system("You are helpful."),
            Message::system("Use the docs.").with_name(RAG_PROMPT_NAME),
        ]);
        pipe.memory = memory();
        let chunks = [
            SimilarChunk::new("First."),
            SimilarChunk::new("Second.").with_document("b.md"),
        ];

        let message = system_prompt_message(&pipe, Some(&chunks))
            .expect("composes")
            .expect("has prompt");
        assert_eq!(
            message.content,
            "You are helpful.\n\nUse the docs.\n\nCONTEXT:\n\
             First.\n\nSource: unknown [1]\n\n-------------\n\n\
             Second.\n\nSource: b.md [2]"
        );
    }

    #[test]
    fn test_memory_without_chunks_renders_empty_slot() {
        let mut pipe = pipe_with(Vec::new());
        pipe.memory = memory();

        let message = system_prompt_message(&pipe, None)
            .expect("composes")
            .expect("has prompt");
        assert_eq!(message.content, format!("{DEFAULT_RAG_PROMPT}\n\nCONTEXT:\n"));
    }

    #[test]
    fn test_multiple_primary_prompts_rejected() {
        let pipe = pipe_with(vec![Message::system("One."), Message::system("Two.")]);
        assert!(matches!(
            system_prompt_message(&pipe, None),
            Err(CompositionError::MultipleSystemPrompts { count: 2 })
        ));
    }
}
