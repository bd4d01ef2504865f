//! Error taxonomy for the model gateway.

use docforge_core::{ErrorKind, Stage, StageError};

/// Errors surfaced by [`crate::client::ModelGateway`].
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Connect failure, timeout, or 5xx, already retried per the backoff
    /// policy (spec §4.3).
    #[error("model runtime unavailable after retries: {0}")]
    Transport(String),
    /// 4xx response — retrying would not help, surfaced immediately.
    #[error("model runtime rejected the request ({status}): {body}")]
    Permanent {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },
    /// The runtime's response body didn't match the expected shape.
    #[error("malformed response from model runtime: {0}")]
    Decode(String),
    /// `/api/tags` didn't advertise a model the caller asserted was required.
    #[error("required model not present on the model runtime: {0}")]
    MissingModel(String),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    /// Maps this error onto the shared stage failure taxonomy (spec §7).
    #[must_use]
    pub fn into_stage_error(self, stage: Stage) -> StageError {
        let kind = match &self {
            Self::Permanent { .. } => ErrorKind::PermanentInput,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Decode(_) | Self::MissingModel(_) => ErrorKind::Validation,
        };
        StageError::new(stage, kind, self.to_string())
    }
}
