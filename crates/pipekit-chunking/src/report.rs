//! Diagnostics collected while chunking

use serde::Serialize;

/// A size violation observed while splitting or merging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChunkWarning {
    /// A piece at or above the maximum with no separators left to split it
    OversizedPiece { length: usize, max: usize },

    /// A merge window whose running total exceeded the maximum
    OversizedWindow { length: usize, max: usize },
}

impl std::fmt::Display for ChunkWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OversizedPiece { length, max } => write!(
                f,
                "Piece of size {length} cannot be split further and is at or above the maximum of {max}"
            ),
            Self::OversizedWindow { length, max } => write!(
                f,
                "Created a chunk of size {length}, which is longer than the specified {max}"
            ),
        }
    }
}

/// Chunks plus every warning raised while producing them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChunkingReport {
    pub chunks: Vec<String>,
    pub warnings: Vec<ChunkWarning>,
}

impl ChunkingReport {
    pub(crate) fn warn(&mut self, warning: ChunkWarning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
