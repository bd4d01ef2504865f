use crate::error::Result;
use crate::pages::PageMap;
use crate::types::ChunkDraft;
use crate::window::{window_chunk_spans, word_spans};

use super::Chunker;

/// Default strategy (spec §4.10): split by `--- PAGE n ---` delimiter first,
/// then word-window each page independently, so every chunk is attributable
/// to exactly one page.
#[derive(Debug, Default)]
pub struct ContextualChunker;

impl Chunker for ContextualChunker {
    fn name(&self) -> &'static str {
        "contextual_chunking"
    }

    fn chunk(&self, text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<ChunkDraft>> {
        let page_map = PageMap::build(text);
        let mut drafts = Vec::new();

        for (page, _offset, segment) in page_map.segments(text) {
            let spans = word_spans(segment);
            for (start, end) in window_chunk_spans(&spans, chunk_size, chunk_overlap)? {
                let trimmed = segment[start..end].trim();
                if trimmed.is_empty() {
                    continue;
                }
                drafts.push(ChunkDraft::new(trimmed.to_string(), page, page, None));
            }
        }

        Ok(drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_each_page_independently() {
        let text = "--- PAGE 1 ---\nfirst page body text here\n--- PAGE 2 ---\nsecond page body text here";
        let drafts = ContextualChunker.chunk(text, 3, 1).unwrap();
        assert!(drafts.iter().any(|d| d.page_start == 1 && d.page_end == 1));
        assert!(drafts.iter().any(|d| d.page_start == 2 && d.page_end == 2));
    }

    #[test]
    fn no_chunk_is_empty() {
        let text = "--- PAGE 1 ---\n   \n--- PAGE 2 ---\nsomething";
        let drafts = ContextualChunker.chunk(text, 10, 2).unwrap();
        assert!(drafts.iter().all(|d| !d.text.trim().is_empty()));
    }

    #[test]
    fn no_page_markers_falls_back_to_single_page() {
        let drafts = ContextualChunker.chunk("just plain text with no markers", 3, 1).unwrap();
        assert!(drafts.iter().all(|d| d.page_start == 1 && d.page_end == 1));
    }
}
