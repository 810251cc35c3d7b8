//! Merging small pieces into overlapping chunks
//!
//! Pieces accumulate in a sliding window. When the next piece would push the
//! window past the maximum, the window is emitted as a chunk and then shrunk
//! from the front until it holds at most `chunk_overlap` worth of trailing
//! text (and leaves room for the incoming piece). Whatever remains becomes the
//! overlap carried into the next chunk.

use crate::length::LengthCounter;
use crate::report::{ChunkWarning, ChunkingReport};
use pipekit_config::ChunkingConfig;
use std::collections::VecDeque;

/// Merge `splits` into chunks joined by `separator`
///
/// Warnings are logged and discarded; use [`merge_splits_into`] to keep them.
pub fn merge_splits<S: AsRef<str>>(
    splits: &[S],
    separator: &str,
    config: &ChunkingConfig,
    counter: &dyn LengthCounter,
) -> Vec<String> {
    let mut report = ChunkingReport::default();
    merge_splits_into(splits, separator, config, counter, &mut report);
    report.chunks
}

/// Merge `splits` and append the chunks and warnings to `report`
pub fn merge_splits_into<S: AsRef<str>>(
    splits: &[S],
    separator: &str,
    config: &ChunkingConfig,
    counter: &dyn LengthCounter,
    report: &mut ChunkingReport,
) {
    let max = config.chunk_max_length;
    let overlap = config.chunk_overlap;
    let separator_len = counter.count(separator);

    let mut window: VecDeque<(&str, usize)> = VecDeque::new();
    let mut total = 0usize;

    for piece in splits {
        let piece = piece.as_ref();
        let len = counter.count(piece);
        let joiner = if window.is_empty() { 0 } else { separator_len };

        if total.saturating_add(len).saturating_add(joiner) > max {
            if total > max {
                report.warn(ChunkWarning::OversizedWindow { length: total, max });
            }

            if !window.is_empty() {
                if let Some(chunk) = join_window(&window, separator) {
                    report.chunks.push(chunk);
                }

                while total > overlap || (total.saturating_add(len) > max && total > 0) {
                    let Some((_, front_len)) = window.pop_front() else {
                        break;
                    };
                    total = total.saturating_sub(front_len);
                }
            }
        }

        window.push_back((piece, len));
        total = total.saturating_add(len);
    }

    if let Some(chunk) = join_window(&window, separator) {
        report.chunks.push(chunk);
    }
}

/// Join and trim the window; blank results are dropped
fn join_window(window: &VecDeque<(&str, usize)>, separator: &str) -> Option<String> {
    let joined = window
        .iter()
        .map(|(piece, _)| *piece)
        .collect::<Vec<_>>()
        .join(separator);
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
