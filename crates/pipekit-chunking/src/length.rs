//! Length functions used to size pieces and chunks

use crate::error::{ChunkingError, ChunkingResult};
use tiktoken_rs::{CoreBPE, cl100k_base, o200k_base, p50k_base, r50k_base};

/// Measures text for the splitter
pub trait LengthCounter: Send + Sync {
    /// Name of the counter for identification
    fn name(&self) -> &str;

    /// Length of `text` in this counter's unit
    fn count(&self, text: &str) -> usize;
}

/// Counts Unicode scalar values
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCounter;

impl LengthCounter for CharCounter {
    fn name(&self) -> &'static str {
        "chars"
    }

    fn count(&self, text: &str) -> usize {
        text.chars().count()
    }
}

/// Counts UTF-16 code units, as JavaScript's `String.length` does
///
/// Characters outside the Basic Multilingual Plane count twice.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf16Counter;

impl LengthCounter for Utf16Counter {
    fn name(&self) -> &'static str {
        "utf16"
    }

    fn count(&self, text: &str) -> usize {
        text.encode_utf16().count()
    }
}

/// Counts tokens with a tiktoken encoding, so limits can be set in model tokens
pub struct TiktokenCounter {
    model_name: String,
    encoder: CoreBPE,
}

impl TiktokenCounter {
    /// Create a counter using the encoding of `model_name`
    ///
    /// # Errors
    /// Returns `ChunkingError::TokenCounting` if the encoding fails to load
    pub fn new(model_name: &str) -> ChunkingResult<Self> {
        let encoder = Self::encoder_for_model(model_name)
            .map_err(|e| ChunkingError::token_counting(format!("{model_name}: {e}")))?;

        Ok(Self {
            model_name: model_name.to_string(),
            encoder,
        })
    }

    fn encoder_for_model(model_name: &str) -> Result<CoreBPE, impl std::fmt::Display> {
        match model_name {
            name if name.starts_with("gpt-4o") || name.starts_with("o1") || name.starts_with("o3") => {
                o200k_base()
            }
            name if name.starts_with("text-davinci") || name.starts_with("code-") => p50k_base(),
            name if name.starts_with("davinci") || name.starts_with("curie") => r50k_base(),
            // gpt-4, gpt-3.5 and embedding models
            _ => cl100k_base(),
        }
    }
}

impl std::fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl LengthCounter for TiktokenCounter {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn count(&self, text: &str) -> usize {
        self.encoder.encode_ordinary(text).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_counter_counts_scalars_not_bytes() {
        let counter = CharCounter;
        assert_eq!(counter.count("abc"), 3);
        assert_eq!(counter.count("héllo"), 5);
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn test_utf16_counter_counts_surrogate_pairs() {
        let counter = Utf16Counter;
        assert_eq!(counter.count("abc"), 3);
        assert_eq!(counter.count("héllo"), 5);
        assert_eq!(counter.count("😀😀"), 4);
        assert_eq!(CharCounter.count("😀😀"), 2);
    }

    #[test]
    fn test_tiktoken_counter() {
        let counter = TiktokenCounter::new("gpt-4").expect("Should create counter");
        assert_eq!(counter.name(), "gpt-4");

        let count = counter.count("Hello, world!");
        assert!(count > 0, "Should count tokens");
        assert!(count < "Hello, world!".len(), "Tokens are coarser than bytes");
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn test_tiktoken_counter_handles_unicode() {
        let counter = TiktokenCounter::new("gpt-4o-mini").expect("Should create counter");
        assert!(counter.count("你好世界") > 0);
        assert!(counter.count("Hello 👋 World 🌍") > 0);
    }
}
