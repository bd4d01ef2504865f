//! Orchestrator configuration: concurrency bounds, stage timeout, bucket
//! names, and the execution mode that toggles which stages do real work
//! (spec §4.11 "execution modes").

use std::time::Duration;

/// Which stages are allowed to do real work for a given run. The ten-stage
/// sequence itself never changes (spec §4.11); a disabled stage still runs
/// but leaves its fields at their zero value and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Every stage does real work.
    Production,
    /// Skips vision analysis and embedding generation; everything else runs.
    Demo,
    /// Only extraction and image processing (with vision); classification,
    /// chunking, and embeddings are skipped.
    ImageOnly,
    /// Only chunking and embedding generation; images and classification are
    /// skipped.
    EmbeddingOnly,
    /// Only classification and metadata extraction; images, chunking, and
    /// embeddings are skipped.
    ClassificationOnly,
    /// Every stage does real work, same as `Production`; kept distinct so
    /// integration tests can select it explicitly without implying this is
    /// the production default.
    FullTest,
}

impl Default for ExecutionMode {
    fn default() -> Self {
        Self::Production
    }
}

/// Per-stage on/off switches derived from an [`ExecutionMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StageToggles {
    pub process_images: bool,
    pub vision: bool,
    pub classify: bool,
    pub extract_metadata: bool,
    pub process_chunks: bool,
    pub generate_embeddings: bool,
}

impl StageToggles {
    const ALL: Self = Self {
        process_images: true,
        vision: true,
        classify: true,
        extract_metadata: true,
        process_chunks: true,
        generate_embeddings: true,
    };
}

impl ExecutionMode {
    pub(crate) fn toggles(self) -> StageToggles {
        match self {
            Self::Production | Self::FullTest => StageToggles::ALL,
            Self::Demo => StageToggles {
                vision: false,
                generate_embeddings: false,
                ..StageToggles::ALL
            },
            Self::ImageOnly => StageToggles {
                classify: false,
                extract_metadata: false,
                process_chunks: false,
                generate_embeddings: false,
                ..StageToggles::ALL
            },
            Self::EmbeddingOnly => StageToggles {
                process_images: false,
                vision: false,
                classify: false,
                extract_metadata: false,
                ..StageToggles::ALL
            },
            Self::ClassificationOnly => StageToggles {
                process_images: false,
                vision: false,
                process_chunks: false,
                generate_embeddings: false,
                ..StageToggles::ALL
            },
        }
    }
}

/// Orchestrator-level configuration (spec §5).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Which stages actually run work for this orchestrator instance.
    pub execution_mode: ExecutionMode,
    /// Upper bound on documents admitted concurrently (default 3).
    pub max_concurrent_documents: usize,
    /// Upper bound on per-item fan-out inside `process_images` and
    /// `generate_embeddings` (default 10).
    pub max_concurrent_chunks: usize,
    /// Soft per-stage timeout; exceeding it cancels the stage and fails the
    /// document (default 10 minutes).
    pub stage_timeout: Duration,
    /// Object-store bucket for raw PDF uploads.
    pub documents_bucket: String,
    /// Object-store bucket for extracted images.
    pub images_bucket: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            execution_mode: ExecutionMode::Production,
            max_concurrent_documents: 3,
            max_concurrent_chunks: 10,
            stage_timeout: Duration::from_secs(600),
            documents_bucket: "krai-documents".to_string(),
            images_bucket: "krai-images".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the execution mode.
    #[must_use]
    pub const fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    /// Sets the max concurrent documents admitted at once.
    #[must_use]
    pub const fn with_max_concurrent_documents(mut self, limit: usize) -> Self {
        self.max_concurrent_documents = limit;
        self
    }

    /// Sets the max concurrent per-item fan-out inside `process_images` and
    /// `generate_embeddings`.
    #[must_use]
    pub const fn with_max_concurrent_chunks(mut self, limit: usize) -> Self {
        self.max_concurrent_chunks = limit;
        self
    }

    /// Sets the soft per-stage timeout.
    #[must_use]
    pub const fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    /// Sets the documents bucket name.
    #[must_use]
    pub fn with_documents_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.documents_bucket = bucket.into();
        self
    }

    /// Sets the images bucket name.
    #[must_use]
    pub fn with_images_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.images_bucket = bucket.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_mode_disables_vision_and_embeddings_only() {
        let toggles = ExecutionMode::Demo.toggles();
        assert!(!toggles.vision);
        assert!(!toggles.generate_embeddings);
        assert!(toggles.classify);
        assert!(toggles.process_chunks);
    }

    #[test]
    fn image_only_mode_disables_classification_and_chunking() {
        let toggles = ExecutionMode::ImageOnly.toggles();
        assert!(toggles.process_images);
        assert!(toggles.vision);
        assert!(!toggles.classify);
        assert!(!toggles.process_chunks);
        assert!(!toggles.generate_embeddings);
    }

    #[test]
    fn production_and_full_test_enable_every_stage() {
        assert_eq!(ExecutionMode::Production.toggles(), ExecutionMode::FullTest.toggles());
        let toggles = ExecutionMode::Production.toggles();
        assert!(toggles.process_images && toggles.vision && toggles.classify);
        assert!(toggles.extract_metadata && toggles.process_chunks && toggles.generate_embeddings);
    }
}
