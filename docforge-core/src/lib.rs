//! Shared domain entities for the docforge ingestion pipeline.
//!
//! Every downstream crate (`docforge-pdf`, `docforge-classify`, `docforge-chunk`,
//! `docforge-gateway`, `docforge-storage`, `docforge-pipeline`) builds on the plain
//! data types defined here instead of passing string-keyed bags between stages.
//! This crate performs no I/O.

pub mod codes;
pub mod document;
mod embedding;
mod image;
mod manufacturer;
mod stage;

pub use codes::{ExtractedCode, ExtractedPart};
pub use document::{Document, DocumentMetadata, DocumentType, ProcessingStatus};
pub use embedding::Embedding;
pub use image::Image;
pub use manufacturer::{Manufacturer, Product};
pub use stage::{ErrorKind, Stage, StageError};

/// A contiguous slice of a document's text, bounded in size, the unit of
/// embedding and retrieval.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Chunk {
    /// Stable identifier.
    pub id: uuid::Uuid,
    /// Owning document.
    pub document_id: uuid::Uuid,
    /// Zero-based, dense index within the document.
    pub chunk_index: u32,
    /// First page contributing text to this chunk (1-based).
    pub page_start: u32,
    /// Last page contributing text to this chunk (1-based).
    pub page_end: u32,
    /// Chunk text.
    pub text_chunk: String,
    /// Word-count estimate.
    pub token_count: u32,
    /// Hash of `text_chunk`, used for dedup and change detection.
    pub fingerprint: String,
    /// Nearest detected section heading, if any.
    pub section_title: Option<String>,
    /// Lifecycle status for this row.
    pub processing_status: ProcessingStatus,
}

impl Chunk {
    /// Builds a chunk in the `Completed` state with no section title, the
    /// common case once a chunk has been produced by the chunker.
    #[must_use]
    pub fn new(
        document_id: uuid::Uuid,
        chunk_index: u32,
        page_start: u32,
        page_end: u32,
        text_chunk: impl Into<String>,
        token_count: u32,
        fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            document_id,
            chunk_index,
            page_start,
            page_end,
            text_chunk: text_chunk.into(),
            token_count,
            fingerprint: fingerprint.into(),
            section_title: None,
            processing_status: ProcessingStatus::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_defaults_to_completed() {
        let doc_id = uuid::Uuid::new_v4();
        let chunk = Chunk::new(doc_id, 0, 1, 1, "hello world", 2, "abc123");
        assert_eq!(chunk.processing_status, ProcessingStatus::Completed);
        assert_eq!(chunk.document_id, doc_id);
        assert!(chunk.section_title.is_none());
    }
}
