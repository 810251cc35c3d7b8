//! Recursive separator-based text splitter

use crate::error::{ChunkingError, ChunkingResult};
use crate::length::{CharCounter, LengthCounter};
use crate::merge::merge_splits_into;
use crate::report::{ChunkWarning, ChunkingReport};
use crate::separators::{DEFAULT_SEPARATORS, Language};
use pipekit_config::{ChunkingConfig, Validate};
use std::sync::Arc;

/// Splits text on the highest-priority separator present, recursing into
/// pieces that are still too long with the lower-priority separators.
///
/// Separators are kept: every piece after the first starts with the separator
/// it was split on, so joining the pieces of a chunk needs no separator.
#[derive(Clone)]
pub struct RecursiveTextSplitter {
    config: ChunkingConfig,
    separators: Vec<String>,
    counter: Arc<dyn LengthCounter>,
}

impl RecursiveTextSplitter {
    /// Splitter with the default paragraph/line/word/character separators
    ///
    /// # Errors
    /// Returns `ChunkingError::Configuration` if `chunk_overlap >= chunk_max_length`
    /// or the maximum is zero
    pub fn new(config: ChunkingConfig) -> ChunkingResult<Self> {
        Self::with_separators(config, DEFAULT_SEPARATORS.iter().copied())
    }

    /// Splitter with a custom separator list, highest priority first
    ///
    /// # Errors
    /// Returns `ChunkingError::Configuration` for invalid sizes or an empty list
    pub fn with_separators<I, S>(config: ChunkingConfig, separators: I) -> ChunkingResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        config
            .validate()
            .map_err(|e| ChunkingError::configuration(e.to_string()))?;

        let separators: Vec<String> = separators.into_iter().map(Into::into).collect();
        if separators.is_empty() {
            return Err(ChunkingError::configuration(
                "At least one separator is required",
            ));
        }

        Ok(Self {
            config,
            separators,
            counter: Arc::new(CharCounter),
        })
    }

    /// Splitter using a language's separator preset
    ///
    /// # Errors
    /// Returns `ChunkingError::Configuration` for invalid sizes
    pub fn from_language(language: Language, config: ChunkingConfig) -> ChunkingResult<Self> {
        Self::with_separators(config, language.separators().iter().copied())
    }

    /// Measure lengths with `counter` instead of counting characters
    #[must_use]
    pub fn with_length_counter(mut self, counter: Arc<dyn LengthCounter>) -> Self {
        self.counter = counter;
        self
    }

    pub const fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    pub fn separators(&self) -> &[String] {
        &self.separators
    }

    /// Split `text` into chunks
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let mut report = ChunkingReport::default();
        self.split_recursive(text, &self.separators, &mut report);
        report.chunks
    }

    /// Split `text` and strip NUL characters from every chunk
    pub fn create_chunks(&self, text: &str) -> Vec<String> {
        self.create_chunks_with_report(text).chunks
    }

    /// Like [`Self::create_chunks`] but keeps the size warnings
    pub fn create_chunks_with_report(&self, text: &str) -> ChunkingReport {
        let mut report = ChunkingReport::default();
        self.split_recursive(text, &self.separators, &mut report);

        for chunk in &mut report.chunks {
            if chunk.contains('\0') {
                *chunk = chunk.replace('\0', "");
            }
        }

        tracing::debug!(
            chunks = report.chunks.len(),
            warnings = report.warnings.len(),
            counter = self.counter.name(),
            "Split text into chunks"
        );
        report
    }

    fn split_recursive(&self, text: &str, separators: &[String], report: &mut ChunkingReport) {
        let max = self.config.chunk_max_length;
        let (separator, remaining) = select_separator(text, separators);

        let mut good_splits: Vec<&str> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if self.counter.count(piece) < max {
                good_splits.push(piece);
                continue;
            }

            if !good_splits.is_empty() {
                merge_splits_into(&good_splits, "", &self.config, self.counter.as_ref(), report);
                good_splits.clear();
            }

            match remaining {
                Some(rest) if !rest.is_empty() => self.split_recursive(piece, rest, report),
                _ => {
                    report.warn(ChunkWarning::OversizedPiece {
                        length: self.counter.count(piece),
                        max,
                    });
                    report.chunks.push(piece.to_string());
                }
            }
        }

        if !good_splits.is_empty() {
            merge_splits_into(&good_splits, "", &self.config, self.counter.as_ref(), report);
        }
    }
}

impl std::fmt::Debug for RecursiveTextSplitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecursiveTextSplitter")
            .field("config", &self.config)
            .field("separators", &self.separators)
            .field("counter", &self.counter.name())
            .finish()
    }
}

/// Pick the first separator present in `text`
///
/// Returns the separator and the lower-priority ones still available for
/// recursion. The empty separator is taken as soon as it is reached and
/// leaves nothing below it; when nothing matches the last separator is used
/// with nothing below it either.
fn select_separator<'a>(text: &str, separators: &'a [String]) -> (&'a str, Option<&'a [String]>) {
    let mut rest = separators;
    while let Some((candidate, tail)) = rest.split_first() {
        if candidate.is_empty() {
            return (candidate, None);
        }
        if text.contains(candidate.as_str()) {
            return (candidate, Some(tail));
        }
        rest = tail;
    }
    (separators.last().map_or("", String::as_str), None)
}

/// Split before every occurrence of `separator`, dropping empty pieces
///
/// Occurrences may overlap: `"\n\n\n"` split on `"\n\n"` gives `"\n"` and
/// `"\n\n"`. The empty separator splits into characters.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text.split_inclusive(|_: char| true).collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (index, _) in text.char_indices().skip(1) {
        let at_separator = text
            .get(index..)
            .is_some_and(|rest| rest.starts_with(separator));
        if at_separator {
            if let Some(piece) = text.get(start..index) {
                pieces.push(piece);
            }
            start = index;
        }
    }
    if let Some(piece) = text.get(start..) {
        pieces.push(piece);
    }

    pieces.retain(|piece| !piece.is_empty());
    pieces
}
