//! Error taxonomy for the object-store and relational-store adapters.

use docforge_core::{ErrorKind, Stage, StageError};

/// Errors surfaced by [`crate::objects::ObjectStore`] and
/// [`crate::relational::RelationalStore`].
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Transport failure talking to the object store's REST surface.
    #[error("object store request failed: {0}")]
    ObjectTransport(#[from] reqwest::Error),
    /// The object store responded with an unexpected status.
    #[error("object store returned {status}: {body}")]
    ObjectStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },
    /// A relational-store query failed.
    #[error("relational store error: {0}")]
    Relational(#[from] sqlx::Error),
    /// A row fetched from the relational store could not be decoded into a
    /// domain type.
    #[error("malformed row in {table}: {reason}")]
    MalformedRow {
        /// Table the row came from.
        table: &'static str,
        /// Why decoding failed.
        reason: String,
    },
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// Classifies this error as a [`StageError`] for a given stage, matching
    /// the taxonomy in spec §7: object/relational transport failures are
    /// `Transport` unless the status is a 4xx, which is `PermanentInput`.
    #[must_use]
    pub fn into_stage_error(self, stage: Stage) -> StageError {
        let kind = match &self {
            Self::ObjectStatus { status, .. } if (400..500).contains(status) => ErrorKind::PermanentInput,
            Self::ObjectTransport(_) | Self::ObjectStatus { .. } => ErrorKind::Transport,
            Self::Relational(_) | Self::MalformedRow { .. } => ErrorKind::FatalStage,
        };
        StageError::new(stage, kind, self.to_string())
    }
}
