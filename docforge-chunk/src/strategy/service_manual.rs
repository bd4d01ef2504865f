use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::pages::PageMap;
use crate::types::ChunkDraft;

use super::{Chunker, find_sections, sections_to_drafts};

static SECTION_HEAD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\d+\.\s+[A-Z]").unwrap());

/// Splits on numbered section heads (`"1. TROUBLESHOOTING"`); a section
/// longer than `chunk_size` words falls back to word-window splitting with
/// overlap (spec §4.10).
#[derive(Debug, Default)]
pub struct ServiceManualChunker;

impl Chunker for ServiceManualChunker {
    fn name(&self) -> &'static str {
        "service_manual"
    }

    fn chunk(&self, text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<ChunkDraft>> {
        let page_map = PageMap::build(text);
        let sections = find_sections(text, &SECTION_HEAD);
        sections_to_drafts(text, &page_map, &sections, chunk_size, chunk_overlap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_numbered_section_heads() {
        let text = "1. TROUBLESHOOTING\nCheck the fuser assembly for damage.\n2. DISASSEMBLY\nRemove the rear cover first.";
        let drafts = ServiceManualChunker.chunk(text, 50, 5).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].section_title.as_deref(), Some("1. TROUBLESHOOTING"));
        assert_eq!(drafts[1].section_title.as_deref(), Some("2. DISASSEMBLY"));
    }

    #[test]
    fn oversized_section_is_word_windowed() {
        let body: String = (0..200).map(|i| format!("word{i} ")).collect();
        let text = format!("1. LONG SECTION\n{body}");
        let drafts = ServiceManualChunker.chunk(&text, 20, 4).unwrap();
        assert!(drafts.len() > 1);
        assert!(drafts.iter().all(|d| d.section_title.as_deref() == Some("1. LONG SECTION")));
    }

    #[test]
    fn no_headings_falls_back_to_whole_document_windowing() {
        let text = "just a plain paragraph with no numbered headings at all in it";
        let drafts = ServiceManualChunker.chunk(text, 5, 1).unwrap();
        assert!(!drafts.is_empty());
        assert!(drafts.iter().all(|d| d.section_title.is_none()));
    }

    #[test]
    fn chunks_are_attributed_to_pages() {
        let text = "--- PAGE 1 ---\n1. SECTION ONE\nbody text\n--- PAGE 2 ---\n2. SECTION TWO\nmore body text";
        let drafts = ServiceManualChunker.chunk(text, 50, 5).unwrap();
        assert!(drafts.iter().any(|d| d.page_start == 1));
        assert!(drafts.iter().any(|d| d.page_start == 2));
    }
}
