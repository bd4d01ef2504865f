//! The pipeline's failure taxonomy, shared by every stage so the orchestrator
//! never has to guess what a component's error means.

use core::fmt;

/// A named stage in the ten-stage ingestion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Hash the input and check for a prior ingestion.
    UploadCheck,
    /// Upload the raw PDF bytes to the documents bucket.
    UploadDocument,
    /// Extract per-page text and embedded images.
    ExtractContent,
    /// Dedupe, describe, and upload extracted images.
    ProcessImages,
    /// Classify document type, manufacturer, and series.
    ClassifyDocument,
    /// Extract version string and model numbers.
    ExtractMetadata,
    /// Persist the document row and resolve manufacturer/product rows.
    StoreDocument,
    /// Split text into chunks and persist them.
    ProcessChunks,
    /// Embed chunks and persist the resulting vectors.
    GenerateEmbeddings,
    /// Mark the document completed.
    Finalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UploadCheck => "upload_check",
            Self::UploadDocument => "upload_document",
            Self::ExtractContent => "extract_content",
            Self::ProcessImages => "process_images",
            Self::ClassifyDocument => "classify_document",
            Self::ExtractMetadata => "extract_metadata",
            Self::StoreDocument => "store_document",
            Self::ProcessChunks => "process_chunks",
            Self::GenerateEmbeddings => "generate_embeddings",
            Self::Finalize => "finalize",
        };
        f.write_str(name)
    }
}

/// Classification of *why* a stage failed, independent of which stage it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Connect failure or 5xx from an external HTTP service; already retried.
    Transport,
    /// 4xx or structurally invalid input; retrying would not help.
    PermanentInput,
    /// A pattern config or required setting failed to validate at load time.
    Validation,
    /// Not actually an error: the same bytes were already ingested.
    Duplicate,
    /// A single item (image, chunk embedding) failed; the stage continues.
    PartialItem,
    /// The stage itself could not complete; the document is marked failed.
    FatalStage,
    /// The caller aborted the operation, or a soft timeout was hit.
    Cancellation,
}

/// The record surfaced to callers for any stage failure (spec §7).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StageError {
    /// Which stage failed.
    pub stage: Stage,
    /// Why it failed.
    pub kind: ErrorKind,
    /// Human-readable detail.
    pub message: String,
    /// Optional remediation hint.
    pub hint: Option<String>,
}

impl StageError {
    /// Creates a stage error with no hint.
    #[must_use]
    pub fn new(stage: Stage, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind,
            message: message.into(),
            hint: None,
        }
    }

    /// Attaches a remediation hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {:?}: {}", self.stage, self.kind, self.message)
    }
}

impl std::error::Error for StageError {}
