//! Retrieved context chunks

use serde::{Deserialize, Serialize};

/// A chunk returned by similarity search over a pipe's memories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarChunk {
    pub content: String,

    #[serde(default)]
    pub score: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_name: Option<String>,
}

impl SimilarChunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            score: 0.0,
            document_name: None,
            memory_name: None,
        }
    }

    #[must_use]
    pub fn with_document(mut self, document_name: impl Into<String>) -> Self {
        self.document_name = Some(document_name.into());
        self
    }

    /// Name shown as the chunk's source
    pub fn source(&self) -> &str {
        self.document_name
            .as_deref()
            .or(self.memory_name.as_deref())
            .unwrap_or("unknown")
    }
}
