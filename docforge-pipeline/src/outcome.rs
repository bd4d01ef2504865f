//! The result of one call to [`crate::orchestrator::Orchestrator::process`].

use docforge_core::StageError;
use uuid::Uuid;

/// Stats returned alongside a successful ingestion (spec §7: "Successful
/// completion returns stats").
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    /// Total pages in the source PDF.
    pub pages: u32,
    /// Chunks persisted for this document.
    pub chunks: u32,
    /// Embedding rows persisted, including degraded ones.
    pub embeddings: u32,
    /// Embedding rows among those that are zero-filled placeholders.
    pub embeddings_degraded: u32,
    /// Images persisted for this document.
    pub images: u32,
    /// Distinct model numbers found or expanded by the model extractor.
    pub models_found: u32,
    /// Classifier's overall hybrid confidence, in `[0, 1]`.
    pub confidence: f32,
}

/// Result of [`crate::orchestrator::Orchestrator::process`] (spec §4.11).
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// The document was ingested and `finalize` completed.
    Success {
        /// Identifier of the newly created document.
        document_id: Uuid,
        /// Summary counters for this run.
        stats: RunStats,
    },
    /// `upload_check` found an existing document with the same content hash.
    Duplicate {
        /// Identifier of the document that was already ingested.
        existing_document_id: Uuid,
    },
    /// A fatal-stage or permanent-input failure aborted the run.
    Error(StageError),
}
