//! Structure-aware text chunking (C10, spec §4.10).
//!
//! Splits a document's cleaned text into size-bounded, overlapping chunks
//! using one of four strategies (`contextual_chunking`, `service_manual`,
//! `bulletin`, `generic`), selected by [`docforge_config::PatternSnapshot::chunk_settings`]
//! from the document's type and manufacturer. `chunk_index` and
//! `document_id` are intentionally absent from the output: the orchestrator
//! assigns them once every chunk has been collected in document order.

pub mod cleaning;
pub mod error;
mod fingerprint;
mod pages;
pub mod strategy;
pub mod types;
mod window;

pub use cleaning::{BasicCleaner, Cleaner};
pub use error::{ChunkError, Result};
pub use fingerprint::content_hash;
pub use strategy::{BulletinChunker, Chunker, ContextualChunker, GenericChunker, ServiceManualChunker};
pub use types::ChunkDraft;

use docforge_config::PatternSnapshot;

/// Cleans and chunks `text` for a document of `document_type` from
/// `manufacturer` (if known), using whatever strategy and sizing
/// `chunk_settings.json` currently resolves to for that pair.
#[must_use]
pub fn chunk_document(text: &str, document_type: &str, manufacturer: Option<&str>, snapshot: &PatternSnapshot) -> Result<Vec<ChunkDraft>> {
    let cleaned = BasicCleaner.clean(text);
    let settings = snapshot.chunk_settings(document_type, manufacturer);
    strategy::dispatch(&settings.strategy, &cleaned, settings.chunk_size, settings.chunk_overlap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docforge_config::{PatternConfigStore, write_minimal_fixture};

    fn snapshot() -> std::sync::Arc<docforge_config::PatternSnapshot> {
        let dir = tempfile::tempdir().unwrap();
        write_minimal_fixture(dir.path()).unwrap();
        PatternConfigStore::load(dir.path()).unwrap().snapshot()
    }

    #[test]
    fn service_manual_document_uses_service_manual_strategy() {
        let snapshot = snapshot();
        let text = "--- PAGE 1 ---\n1. TROUBLESHOOTING\nCheck the fuser assembly for signs of wear.";
        let chunks = chunk_document(text, "service_manual", Some("hp"), &snapshot).unwrap();
        assert!(!chunks.is_empty());
        assert_eq!(chunks[0].section_title.as_deref(), Some("1. TROUBLESHOOTING"));
    }

    #[test]
    fn unknown_document_type_falls_back_to_default_strategy() {
        let snapshot = snapshot();
        let chunks = chunk_document("some plain unstructured text content", "unknown", None, &snapshot).unwrap();
        assert!(!chunks.is_empty());
    }

    #[test]
    fn no_chunk_is_empty_after_trim() {
        let snapshot = snapshot();
        let text = "--- PAGE 1 ---\n   \n--- PAGE 2 ---\nreal content here";
        let chunks = chunk_document(text, "generic", None, &snapshot).unwrap();
        assert!(chunks.iter().all(|c| !c.text.trim().is_empty()));
    }

    #[test]
    fn every_chunk_has_a_fingerprint_and_token_count() {
        let snapshot = snapshot();
        let chunks = chunk_document("some words to be chunked for this test", "generic", None, &snapshot).unwrap();
        for chunk in &chunks {
            assert_eq!(chunk.fingerprint.len(), 40);
            assert!(chunk.token_count > 0);
        }
    }
}
