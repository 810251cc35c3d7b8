//! Pipekit chunking crate
//!
//! Splits documents into bounded, overlapping chunks for embedding. One
//! splitter type handles every input; languages only contribute separator
//! presets.

pub mod error;
pub mod length;
pub mod merge;
pub mod report;
pub mod separators;
pub mod splitter;

// Re-export main types
pub use error::{ChunkingError, ChunkingResult};
pub use length::{CharCounter, LengthCounter, TiktokenCounter, Utf16Counter};
pub use merge::{merge_splits, merge_splits_into};
pub use pipekit_config::ChunkingConfig;
pub use report::{ChunkWarning, ChunkingReport};
pub use separators::{DEFAULT_SEPARATORS, Language};
pub use splitter::RecursiveTextSplitter;
