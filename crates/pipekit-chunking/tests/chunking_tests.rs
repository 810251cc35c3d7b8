//! End-to-end tests for the recursive splitter

use pipekit_chunking::{
    ChunkWarning, ChunkingConfig, ChunkingError, Language, LengthCounter, RecursiveTextSplitter,
    TiktokenCounter, Utf16Counter,
};
use std::sync::Arc;

/// Counts whitespace-separated words for deterministic testing
struct WordCounter;

impl LengthCounter for WordCounter {
    fn name(&self) -> &str {
        "words"
    }

    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

fn splitter(max: usize, overlap: usize) -> RecursiveTextSplitter {
    RecursiveTextSplitter::new(ChunkingConfig::new(max, overlap)).expect("valid config")
}

#[test]
fn test_words_larger_than_overlap_leave_no_residual_window() {
    let chunks = splitter(10, 2).create_chunks("abcde fghij klmno");
    assert_eq!(chunks, vec!["abcde", "fghij", "klmno"]);
}

#[test]
fn test_overlap_carries_trailing_words() {
    let chunks = splitter(5, 2).create_chunks("a b c d e f g h");
    assert_eq!(chunks, vec!["a b c", "c d", "d e", "e f", "f g", "g h"]);
}

#[test]
fn test_unsplittable_word_is_emitted_with_warning() {
    let splitter =
        RecursiveTextSplitter::with_separators(ChunkingConfig::new(10, 2), [" "]).expect("splitter");
    let report = splitter.create_chunks_with_report("abcdefghijklmnop");

    assert_eq!(report.chunks, vec!["abcdefghijklmnop"]);
    assert_eq!(
        report.warnings,
        vec![ChunkWarning::OversizedPiece { length: 16, max: 10 }]
    );
}

#[test]
fn test_piece_equal_to_maximum_is_flagged() {
    let splitter =
        RecursiveTextSplitter::with_separators(ChunkingConfig::new(5, 1), [" "]).expect("splitter");
    let report = splitter.create_chunks_with_report("abcde");

    assert_eq!(report.chunks, vec!["abcde"]);
    assert_eq!(report.warnings, vec![ChunkWarning::OversizedPiece { length: 5, max: 5 }]);
    assert!(report.warnings[0].to_string().contains("at or above the maximum of 5"));
}

#[test]
fn test_character_fallback_splits_long_words() {
    let report = splitter(10, 2).create_chunks_with_report("abcdefghijklmnop");
    assert!(!report.has_warnings());
    assert_eq!(report.chunks, vec!["abcdefghij", "ijklmnop"]);
}

#[test]
fn test_chunks_are_bounded_and_never_blank() {
    let paragraph = "Pipes bundle a prompt, a model and settings. \
                     Memory turns documents into searchable chunks.\n";
    let text = format!("{paragraph}\n\n{paragraph}{paragraph}\n\n\n{paragraph}   \n\n");

    let report = splitter(50, 10).create_chunks_with_report(&text);
    assert!(!report.chunks.is_empty());
    assert!(!report.has_warnings());
    for chunk in &report.chunks {
        assert!(!chunk.trim().is_empty(), "Blank chunk produced");
        assert!(
            chunk.chars().count() <= 50,
            "Chunk exceeds limit: {chunk:?}"
        );
    }
}

#[test]
fn test_splitting_is_deterministic() {
    let text = "First paragraph here.\n\nSecond one, a bit longer than the first.\nThird line.";
    let splitter = splitter(20, 5);
    assert_eq!(splitter.create_chunks(text), splitter.create_chunks(text));
}

#[test]
fn test_invalid_overlap_fails_at_construction() {
    let result = RecursiveTextSplitter::new(ChunkingConfig::new(100, 150));
    assert!(matches!(result, Err(ChunkingError::Configuration(_))));
}

#[test]
fn test_large_max_length_is_valid_configuration() {
    let splitter = RecursiveTextSplitter::new(ChunkingConfig::new(2_000_000, 100))
        .expect("any positive maximum above the overlap is valid");
    assert_eq!(splitter.config().chunk_max_length, 2_000_000);
    assert_eq!(splitter.create_chunks("one two three"), vec!["one two three"]);

    let at_boundary = RecursiveTextSplitter::new(ChunkingConfig::new(101, 100));
    assert!(at_boundary.is_ok());
    let zero = RecursiveTextSplitter::new(ChunkingConfig::new(0, 0));
    assert!(matches!(zero, Err(ChunkingError::Configuration(_))));
}

#[test]
fn test_empty_text_yields_no_chunks() {
    assert!(splitter(10, 2).create_chunks("").is_empty());
    assert!(splitter(10, 2).create_chunks("   \n\n  ").is_empty());
}

#[test]
fn test_markdown_preset_splits_on_headings() {
    let splitter = RecursiveTextSplitter::from_language(Language::Markdown, ChunkingConfig::new(30, 0))
        .expect("splitter");
    let text = "# Title\nIntro line.\n## Part A\nAlpha text.\n## Part B\nBeta text.";

    assert_eq!(
        splitter.create_chunks(text),
        vec![
            "# Title\nIntro line.",
            "## Part A\nAlpha text.",
            "## Part B\nBeta text."
        ]
    );
}

#[test]
fn test_custom_length_counter() {
    let splitter = splitter(3, 1).with_length_counter(Arc::new(WordCounter));
    let chunks = splitter.create_chunks("one two three four five");
    assert_eq!(chunks, vec!["one two three", "three four five"]);
}

#[test]
fn test_tiktoken_counter_produces_token_sized_chunks() {
    let counter = TiktokenCounter::new("gpt-4").expect("Should create counter");
    let splitter = splitter(16, 4).with_length_counter(Arc::new(counter));

    let text = "The splitter measures every piece with the configured counter. \
                With a tokenizer the limits are expressed in model tokens rather \
                than characters, which keeps chunks aligned with embedding limits.";
    let chunks = splitter.create_chunks(text);

    assert!(chunks.len() > 1, "Long text should produce several chunks");
    assert!(chunks.iter().all(|chunk| !chunk.trim().is_empty()));
}

#[test]
fn test_report_serializes_warnings() {
    let splitter =
        RecursiveTextSplitter::with_separators(ChunkingConfig::new(10, 2), [" "]).expect("splitter");
    let report = splitter.create_chunks_with_report("abcdefghijklmnop");

    let json = serde_json::to_value(&report).expect("serializable");
    assert_eq!(json["warnings"][0]["kind"], "oversized_piece");
    assert_eq!(json["warnings"][0]["length"], 16);
}

#[test]
fn test_utf16_counter_splits_astral_characters_further() {
    let text = "😀😀 x";

    let by_chars = splitter(3, 0).create_chunks(text);
    assert_eq!(by_chars, vec!["😀😀", "x"]);

    let by_code_units = splitter(3, 0)
        .with_length_counter(Arc::new(Utf16Counter))
        .create_chunks(text);
    assert_eq!(by_code_units, vec!["😀", "😀", "x"]);
}
