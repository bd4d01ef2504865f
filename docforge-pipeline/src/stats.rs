//! In-process ingestion counters.
//!
//! The only mutable process-wide state the orchestrator keeps (spec §5),
//! playing the role `aither-mem0`'s store plays for an agent's long-term
//! memory but scoped to run-level counters rather than cross-session
//! content. Plain atomics are enough: every field is a monotonically
//! increasing counter, never read-modify-written as a unit.
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide ingestion counters, safe to share across concurrently
/// in-flight documents.
#[derive(Debug, Default)]
pub struct PipelineStats {
    documents_processed: AtomicU64,
    documents_failed: AtomicU64,
    duplicates_skipped: AtomicU64,
    chunks_created: AtomicU64,
    embeddings_generated: AtomicU64,
    embeddings_degraded: AtomicU64,
    images_processed: AtomicU64,
}

/// Point-in-time read of [`PipelineStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStatsSnapshot {
    pub documents_processed: u64,
    pub documents_failed: u64,
    pub duplicates_skipped: u64,
    pub chunks_created: u64,
    pub embeddings_generated: u64,
    pub embeddings_degraded: u64,
    pub images_processed: u64,
}

impl PipelineStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_success(&self, chunks: u64, embeddings: u64, degraded: u64, images: u64) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        self.chunks_created.fetch_add(chunks, Ordering::Relaxed);
        self.embeddings_generated.fetch_add(embeddings, Ordering::Relaxed);
        self.embeddings_degraded.fetch_add(degraded, Ordering::Relaxed);
        self.images_processed.fetch_add(images, Ordering::Relaxed);
    }

    pub(crate) fn record_duplicate(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.documents_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads a consistent-enough snapshot of every counter. Individual
    /// fields may be read at slightly different instants under concurrent
    /// writers; no field is ever decremented, so this never produces a
    /// impossible (e.g. negative-delta) reading.
    #[must_use]
    pub fn snapshot(&self) -> PipelineStatsSnapshot {
        PipelineStatsSnapshot {
            documents_processed: self.documents_processed.load(Ordering::Relaxed),
            documents_failed: self.documents_failed.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            chunks_created: self.chunks_created.load(Ordering::Relaxed),
            embeddings_generated: self.embeddings_generated.load(Ordering::Relaxed),
            embeddings_degraded: self.embeddings_degraded.load(Ordering::Relaxed),
            images_processed: self.images_processed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_across_multiple_documents() {
        let stats = PipelineStats::new();
        stats.record_success(10, 10, 1, 3);
        stats.record_success(5, 5, 0, 1);
        stats.record_duplicate();
        stats.record_failure();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.documents_processed, 2);
        assert_eq!(snapshot.chunks_created, 15);
        assert_eq!(snapshot.embeddings_generated, 15);
        assert_eq!(snapshot.embeddings_degraded, 1);
        assert_eq!(snapshot.images_processed, 4);
        assert_eq!(snapshot.duplicates_skipped, 1);
        assert_eq!(snapshot.documents_failed, 1);
    }
}
