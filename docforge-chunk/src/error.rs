//! Error types for the chunking crate.

use docforge_core::{ErrorKind, Stage, StageError};
use thiserror::Error;

/// Errors that can occur while chunking a document.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// `chunk_settings.json` named a strategy this crate doesn't implement.
    #[error("unknown chunking strategy: {0}")]
    UnknownStrategy(String),

    /// `chunk_overlap >= chunk_size` for a resolved strategy, which would
    /// never advance past the first window.
    #[error("invalid chunk settings: overlap {overlap} >= chunk_size {chunk_size}")]
    InvalidSettings { chunk_size: usize, overlap: usize },
}

/// Result type alias for chunking operations.
pub type Result<T> = std::result::Result<T, ChunkError>;

impl ChunkError {
    /// Maps this error onto the shared stage failure taxonomy (spec §7).
    /// Both variants stem from malformed `chunk_settings.json` content, which
    /// `docforge-config` should have rejected at load time — reaching here
    /// means the stage itself cannot proceed.
    #[must_use]
    pub fn into_stage_error(self, stage: Stage) -> StageError {
        StageError::new(stage, ErrorKind::FatalStage, self.to_string())
    }
}
