//! Chunker output type.

/// One chunk as produced by a chunking strategy.
///
/// `chunk_index` and `document_id` are deliberately absent: the orchestrator
/// assigns them once chunks from every page have been collected in order,
/// since a single strategy invocation only sees one document's text and has
/// no reason to know its own position in a larger pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkDraft {
    pub text: String,
    pub page_start: u32,
    pub page_end: u32,
    pub section_title: Option<String>,
    pub token_count: u32,
    pub fingerprint: String,
}

impl ChunkDraft {
    pub(crate) fn new(text: String, page_start: u32, page_end: u32, section_title: Option<String>) -> Self {
        let token_count = text.split_whitespace().count() as u32;
        let fingerprint = crate::fingerprint::content_hash(&text);
        Self {
            text,
            page_start,
            page_end,
            section_title,
            token_count,
            fingerprint,
        }
    }
}
