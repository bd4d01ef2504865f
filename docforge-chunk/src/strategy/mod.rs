//! Chunking strategies (C10, spec §4.10).
//!
//! Generalized from a single `Chunker` trait with one impl per splitting
//! heuristic; `dispatch` resolves the strategy named in a document's
//! resolved `chunk_settings` to the matching implementation.

mod bulletin;
mod contextual;
mod generic;
mod service_manual;

use regex::Regex;

pub use bulletin::BulletinChunker;
pub use contextual::ContextualChunker;
pub use generic::GenericChunker;
pub use service_manual::ServiceManualChunker;

use crate::error::{ChunkError, Result};
use crate::pages::PageMap;
use crate::types::ChunkDraft;
use crate::window::{window_chunk_spans, word_spans};

/// One splitting heuristic over a document's cleaned text.
pub trait Chunker: Send + Sync {
    /// Splits `text` into chunks no larger than `chunk_size` words, each
    /// overlapping its predecessor by `chunk_overlap` words where a
    /// size-bounded fallback kicks in.
    fn chunk(&self, text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<ChunkDraft>>;

    /// The name this strategy is selected by in `chunk_settings.json`.
    fn name(&self) -> &'static str;
}

/// Resolves `strategy_name` to its [`Chunker`] and runs it.
pub fn dispatch(strategy_name: &str, text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<ChunkDraft>> {
    let chunker: Box<dyn Chunker> = match strategy_name {
        "contextual_chunking" => Box::new(ContextualChunker),
        "service_manual" => Box::new(ServiceManualChunker),
        "bulletin" => Box::new(BulletinChunker),
        "generic" => Box::new(GenericChunker),
        other => return Err(ChunkError::UnknownStrategy(other.to_string())),
    };
    chunker.chunk(text, chunk_size, chunk_overlap)
}

/// Splits `text` at every line matched by `heading` into `(title, start, end)`
/// sections, where `title` is the matched heading line. With no matches the
/// whole text is returned as one untitled section, so the word-window
/// fallback below still applies to documents with no recognizable structure.
fn find_sections<'a>(text: &'a str, heading: &Regex) -> Vec<(Option<String>, usize, usize)> {
    let starts: Vec<(usize, &'a str)> = heading
        .find_iter(text)
        .map(|m| {
            let line_end = text[m.start()..].find('\n').map_or(text.len(), |nl| m.start() + nl);
            (m.start(), text[m.start()..line_end].trim())
        })
        .collect();

    if starts.is_empty() {
        return vec![(None, 0, text.len())];
    }

    let mut sections = Vec::with_capacity(starts.len());
    for (i, &(start, title)) in starts.iter().enumerate() {
        let end = starts.get(i + 1).map_or(text.len(), |&(next, _)| next);
        sections.push((Some(title.to_string()), start, end));
    }
    sections
}

/// Converts `sections` into chunks: a section within `chunk_size` words
/// becomes one chunk, otherwise it's word-windowed with `chunk_overlap`
/// words of overlap between consecutive windows (spec §4.10).
fn sections_to_drafts(
    text: &str,
    page_map: &PageMap,
    sections: &[(Option<String>, usize, usize)],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<ChunkDraft>> {
    let mut drafts = Vec::new();

    for (title, start, end) in sections {
        let section_text = &text[*start..*end];
        let spans = word_spans(section_text);
        if spans.is_empty() {
            continue;
        }

        for (local_start, local_end) in window_chunk_spans(&spans, chunk_size, chunk_overlap)? {
            let global_start = start + local_start;
            let global_end = start + local_end;
            let trimmed = text[global_start..global_end].trim();
            if trimmed.is_empty() {
                continue;
            }
            let page_start = page_map.page_at(global_start);
            let page_end = page_map.page_at(global_end.saturating_sub(1).max(global_start));
            drafts.push(ChunkDraft::new(trimmed.to_string(), page_start, page_end, title.clone()));
        }
    }

    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_rejects_unknown_strategy() {
        let result = dispatch("made_up_strategy", "some text", 100, 10);
        assert!(matches!(result, Err(ChunkError::UnknownStrategy(_))));
    }

    #[test]
    fn find_sections_falls_back_to_whole_text_with_no_headings() {
        let text = "no headings anywhere in this text";
        let sections = find_sections(text, &Regex::new(r"(?m)^NEVER MATCHES$").unwrap());
        assert_eq!(sections, vec![(None, 0, text.len())]);
    }
}
