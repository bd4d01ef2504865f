use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::pages::PageMap;
use crate::types::ChunkDraft;

use super::{Chunker, find_sections, sections_to_drafts};

static CASE_HEAD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^Case\d+:").unwrap());

/// Splits on `Case1:`/`Case2:`-style boundaries used by manufacturer
/// technical bulletins; the same oversized-section fallback as
/// [`super::ServiceManualChunker`] applies (spec §4.10).
#[derive(Debug, Default)]
pub struct BulletinChunker;

impl Chunker for BulletinChunker {
    fn name(&self) -> &'static str {
        "bulletin"
    }

    fn chunk(&self, text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<ChunkDraft>> {
        let page_map = PageMap::build(text);
        let sections = find_sections(text, &CASE_HEAD);
        sections_to_drafts(text, &page_map, &sections, chunk_size, chunk_overlap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_case_boundaries() {
        let text = "Case1: paper jam in tray 2\nCheck the pickup roller.\nCase2: faint print\nReplace the toner cartridge.";
        let drafts = BulletinChunker.chunk(text, 50, 5).unwrap();
        assert_eq!(drafts.len(), 2);
        assert!(drafts[0].section_title.as_deref().unwrap().starts_with("Case1:"));
        assert!(drafts[1].section_title.as_deref().unwrap().starts_with("Case2:"));
    }

    #[test]
    fn no_case_markers_falls_back_to_whole_document_windowing() {
        let text = "a bulletin with no case markers at all present in the body";
        let drafts = BulletinChunker.chunk(text, 5, 1).unwrap();
        assert!(!drafts.is_empty());
        assert!(drafts.iter().all(|d| d.section_title.is_none()));
    }
}
