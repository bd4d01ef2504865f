//! Progress events emitted during a single document's run through the
//! orchestrator, generalized from the teacher's `agent::event::AgentEvent`
//! (one event enum streamed over a channel as execution advances) to the
//! ten-stage ingestion sequence.

use docforge_core::Stage;
use uuid::Uuid;

/// One stage's progress update for one document (spec §4.11: "each stage
/// emits a progress event with stage id, % complete, current sub-operation").
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// The document this event belongs to.
    pub document_id: Uuid,
    /// Which stage emitted the event.
    pub stage: Stage,
    /// Overall completion percentage in `[0, 100]`, monotonically
    /// non-decreasing for a given document (testable property 8).
    pub percent: u8,
    /// Free-form description of what the stage is currently doing, e.g.
    /// `"uploading image 3/12"`.
    pub sub_operation: String,
}

impl ProgressEvent {
    /// Creates a progress event, clamping `percent` to `[0, 100]`.
    #[must_use]
    pub fn new(document_id: Uuid, stage: Stage, percent: u8, sub_operation: impl Into<String>) -> Self {
        Self {
            document_id,
            stage,
            percent: percent.min(100),
            sub_operation: sub_operation.into(),
        }
    }
}
