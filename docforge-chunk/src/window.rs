//! Word-window splitting shared by every strategy's size-bounded fallback.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ChunkError, Result};

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

/// Byte `(start, end)` span of every whitespace-delimited word in `text`, in
/// order.
#[must_use]
pub fn word_spans(text: &str) -> Vec<(usize, usize)> {
    WORD.find_iter(text).map(|m| (m.start(), m.end())).collect()
}

/// Byte `(start, end)` spans for `chunk_size`-word windows over `spans`,
/// stepping by `chunk_size - chunk_overlap` words so each window after the
/// first repeats its predecessor's last `chunk_overlap` words.
///
/// Returns one span covering the full range if `spans` has `chunk_size`
/// words or fewer.
pub fn window_chunk_spans(spans: &[(usize, usize)], chunk_size: usize, chunk_overlap: usize) -> Result<Vec<(usize, usize)>> {
    if chunk_overlap >= chunk_size {
        return Err(ChunkError::InvalidSettings {
            chunk_size,
            overlap: chunk_overlap,
        });
    }
    if spans.is_empty() {
        return Ok(Vec::new());
    }

    let step = chunk_size - chunk_overlap;
    let mut windows = Vec::new();
    let mut start = 0;
    while start < spans.len() {
        let end = (start + chunk_size).min(spans.len());
        windows.push((spans[start].0, spans[end - 1].1));
        if end == spans.len() {
            break;
        }
        start += step;
    }
    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_window() {
        let text = "one two three";
        let spans = word_spans(text);
        let windows = window_chunk_spans(&spans, 10, 2).unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(&text[windows[0].0..windows[0].1], "one two three");
    }

    #[test]
    fn long_text_produces_overlapping_windows() {
        let text = "a b c d e f g h i j";
        let spans = word_spans(text);
        let windows = window_chunk_spans(&spans, 4, 1).unwrap();
        assert!(windows.len() > 1);
        // consecutive windows overlap by exactly one word's worth of text
        let first = &text[windows[0].0..windows[0].1];
        let second = &text[windows[1].0..windows[1].1];
        assert!(second.starts_with(first.split_whitespace().last().unwrap()));
    }

    #[test]
    fn overlap_at_least_chunk_size_is_rejected() {
        let spans = word_spans("a b c");
        assert!(window_chunk_spans(&spans, 4, 4).is_err());
    }
}
