use crate::error::Result;
use crate::pages::PageMap;
use crate::types::ChunkDraft;
use crate::window::{window_chunk_spans, word_spans};

use super::Chunker;

/// Plain word-window split with overlap, no structural awareness (spec
/// §4.10). Used for document types that have no better-fitting strategy.
#[derive(Debug, Default)]
pub struct GenericChunker;

impl Chunker for GenericChunker {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn chunk(&self, text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<ChunkDraft>> {
        let page_map = PageMap::build(text);
        let spans = word_spans(text);
        let mut drafts = Vec::new();

        for (start, end) in window_chunk_spans(&spans, chunk_size, chunk_overlap)? {
            let trimmed = text[start..end].trim();
            if trimmed.is_empty() {
                continue;
            }
            let page_start = page_map.page_at(start);
            let page_end = page_map.page_at(end.saturating_sub(1).max(start));
            drafts.push(ChunkDraft::new(trimmed.to_string(), page_start, page_end, None));
        }

        Ok(drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_overlapping_windows() {
        let body: String = (0..100).map(|i| format!("word{i} ")).collect();
        let drafts = GenericChunker.chunk(&body, 20, 5).unwrap();
        assert!(drafts.len() > 1);
    }

    #[test]
    fn overlap_never_reproduces_a_neighbor_verbatim() {
        let body: String = (0..100).map(|i| format!("word{i} ")).collect();
        let drafts = GenericChunker.chunk(&body, 20, 5).unwrap();
        for pair in drafts.windows(2) {
            assert_ne!(pair[0].text, pair[1].text);
        }
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let drafts = GenericChunker.chunk("just a few words here", 50, 10).unwrap();
        assert_eq!(drafts.len(), 1);
    }
}
