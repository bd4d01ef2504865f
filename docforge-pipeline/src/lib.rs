//! The staged ingestion orchestrator (C11, spec §4.11).
//!
//! Wires the other six `docforge-*` crates together into the ten-stage
//! sequence a single PDF goes through: hash/dedup check, upload, text and
//! image extraction, classification, metadata extraction, persistence,
//! chunking, embedding, and finalization. [`Orchestrator`] is the crate's
//! only public entry point; everything else here is a supporting type for
//! its inputs, outputs, and running state.

mod config;
mod event;
mod manufacturer_names;
mod orchestrator;
mod outcome;
mod stats;

pub use config::{ExecutionMode, PipelineConfig};
pub use event::ProgressEvent;
pub use orchestrator::Orchestrator;
pub use outcome::{ProcessOutcome, RunStats};
pub use stats::{PipelineStats, PipelineStatsSnapshot};
