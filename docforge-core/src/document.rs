//! The [`Document`] entity and its supporting enums.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::codes::{ExtractedCode, ExtractedPart};

/// Classification of a document's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Service/repair manual.
    ServiceManual,
    /// Parts catalog / bill of materials.
    PartsCatalog,
    /// Customer parts/maintenance database export.
    CpmdDatabase,
    /// Technical bulletin describing a specific issue or fix.
    TechnicalBulletin,
    /// End-user manual.
    UserManual,
    /// Could not be classified with any confidence.
    Unknown,
}

impl Default for DocumentType {
    fn default() -> Self {
        Self::Unknown
    }
}

impl DocumentType {
    /// The `snake_case` wire/storage form, matching the `serde` rename.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ServiceManual => "service_manual",
            Self::PartsCatalog => "parts_catalog",
            Self::CpmdDatabase => "cpmd_database",
            Self::TechnicalBulletin => "technical_bulletin",
            Self::UserManual => "user_manual",
            Self::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "service_manual" => Self::ServiceManual,
            "parts_catalog" => Self::PartsCatalog,
            "cpmd_database" => Self::CpmdDatabase,
            "technical_bulletin" => Self::TechnicalBulletin,
            "user_manual" => Self::UserManual,
            _ => Self::Unknown,
        })
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status shared by documents, chunks, and images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    /// Queued, not yet started.
    Pending,
    /// A stage is currently running.
    Processing,
    /// All applicable stages finished.
    Completed,
    /// A fatal-stage failure left the row in a terminal failed state.
    Failed,
}

impl ProcessingStatus {
    /// The `snake_case` wire/storage form, matching the `serde` rename.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::str::FromStr for ProcessingStatus {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Pending,
        })
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured metadata bag attached to a [`Document`].
///
/// Kept as an explicit record type (not a string-keyed map) per the
/// project's convention of materializing dynamic config/metadata shapes as
/// concrete types built once, rather than passing bags through the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Model numbers found or expanded for this document.
    pub models: Vec<String>,
    /// Detected product series label, e.g. "bizhub".
    pub series: Option<String>,
    /// Placeholder tokens detected before expansion, e.g. "Cxx0i".
    pub placeholders: Vec<String>,
    /// Ids of images extracted from this document.
    pub images: Vec<Uuid>,
    /// Confidence scores keyed by classification axis
    /// (`document_type`, `manufacturer`, `series`, `version`, `hybrid`).
    pub confidences: BTreeMap<String, f32>,
    /// Error codes found in the document's text, validated and deduplicated
    /// (spec §3: "may be inlined into Document.metadata or tabled" — this
    /// project inlines them, since they are read alongside the rest of a
    /// document's metadata and never queried independently).
    pub error_codes: Vec<ExtractedCode>,
    /// Part numbers found in the document's text, validated and deduplicated.
    pub parts: Vec<ExtractedPart>,
}

/// A service manual, parts catalog, or other ingested technical PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier.
    pub id: Uuid,
    /// Original upload filename.
    pub file_name: String,
    /// SHA-256 of the raw bytes. Unique across all documents.
    pub file_hash: String,
    /// Object-store URL of the uploaded PDF.
    pub storage_url: String,
    /// Size of the raw PDF in bytes.
    pub size_bytes: u64,
    /// Total page count.
    pub total_pages: u32,
    /// Classified document type.
    pub document_type: DocumentType,
    /// Resolved manufacturer, once classification has run.
    pub manufacturer_id: Option<Uuid>,
    /// BCP-47-ish language tag; defaults to `"en"`.
    pub language: String,
    /// Lifecycle status.
    pub processing_status: ProcessingStatus,
    /// Overall completion percentage in `[0, 100]`.
    pub processing_progress: u8,
    /// Canonical extracted version string, e.g. `"3, 5/2024"`.
    pub version_string: String,
    /// Structured classification/extraction metadata.
    pub metadata: DocumentMetadata,
    /// Creation timestamp.
    pub created_at: OffsetDateTime,
    /// Completion timestamp, set once `finalize` succeeds.
    pub processed_at: Option<OffsetDateTime>,
}

impl Document {
    /// Creates a new document row in the `Pending` state, as it exists the
    /// moment `upload_check` finds no existing hash match.
    #[must_use]
    pub fn new(file_name: impl Into<String>, file_hash: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            file_hash: file_hash.into(),
            storage_url: String::new(),
            size_bytes,
            total_pages: 0,
            document_type: DocumentType::Unknown,
            manufacturer_id: None,
            language: "en".to_string(),
            processing_status: ProcessingStatus::Pending,
            processing_progress: 0,
            version_string: String::new(),
            metadata: DocumentMetadata::default(),
            created_at: OffsetDateTime::now_utc(),
            processed_at: None,
        }
    }

    /// Advances `processing_progress`, clamping to `[0, 100]` and never
    /// moving backwards (progress monotonicity, testable property 8).
    pub fn advance_progress(&mut self, percent: u8) {
        self.processing_progress = self.processing_progress.max(percent.min(100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_type_round_trips_through_its_string_form() {
        use std::str::FromStr;
        for variant in [
            DocumentType::ServiceManual,
            DocumentType::PartsCatalog,
            DocumentType::CpmdDatabase,
            DocumentType::TechnicalBulletin,
            DocumentType::UserManual,
            DocumentType::Unknown,
        ] {
            assert_eq!(DocumentType::from_str(variant.as_str()), Ok(variant));
        }
    }

    #[test]
    fn progress_never_regresses() {
        let mut doc = Document::new("a.pdf", "hash", 10);
        doc.advance_progress(40);
        doc.advance_progress(10);
        assert_eq!(doc.processing_progress, 40);
        doc.advance_progress(90);
        assert_eq!(doc.processing_progress, 90);
    }

    #[test]
    fn progress_clamped_to_100() {
        let mut doc = Document::new("a.pdf", "hash", 10);
        doc.advance_progress(250);
        assert_eq!(doc.processing_progress, 100);
    }
}
