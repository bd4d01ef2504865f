//! # docforge
//!
//! Façade crate for the document ingestion pipeline: re-exports the domain
//! entities, pattern configuration, PDF extraction, classification, and
//! chunking crates unconditionally, and the external-service adapters
//! (model gateway, object/relational storage, orchestrator) behind feature
//! flags, so an embedding application can depend on just this crate.
//!
//! ## What's inside?
//!
//! - [`docforge_core`] — domain entities (`Document`, `Chunk`, `Embedding`,
//!   `Image`, `Manufacturer`, `Product`) and the shared `Stage`/`ErrorKind`/
//!   `StageError` failure taxonomy.
//! - [`docforge_config`] — hot-reloadable, validated pattern configuration.
//! - [`docforge_pdf`] — PDF text and image extraction.
//! - [`docforge_classify`] — classification, version extraction, model
//!   extraction with placeholder expansion, error-code/part-number extraction.
//! - [`docforge_chunk`] — structure-aware text chunking.
//! - [`gateway`] (feature `gateway`) — the model runtime HTTP client.
//! - [`storage`] (feature `storage`) — object store and relational store adapters.
//! - [`pipeline`] (feature `pipeline`) — the staged ingestion orchestrator.
//!
//! ## Example
//!
//! ```rust,no_run
//! use docforge::pipeline::Orchestrator;
//!
//! async fn demo(orchestrator: &Orchestrator, bytes: &[u8], filename: &str) {
//!     match orchestrator.process(bytes, filename).await {
//!         docforge::pipeline::ProcessOutcome::Success { document_id, stats } => {
//!             println!("ingested {document_id}: {stats:?}");
//!         }
//!         docforge::pipeline::ProcessOutcome::Duplicate { existing_document_id } => {
//!             println!("already ingested as {existing_document_id}");
//!         }
//!         docforge::pipeline::ProcessOutcome::Error(error) => {
//!             eprintln!("ingestion failed: {error}");
//!         }
//!     }
//! }
//! ```

pub use docforge_chunk as chunk;
pub use docforge_classify as classify;
pub use docforge_config as config;
pub use docforge_core::*;
pub use docforge_pdf as pdf;

#[cfg(feature = "gateway")]
pub use docforge_gateway as gateway;

#[cfg(feature = "storage")]
pub use docforge_storage as storage;

#[cfg(feature = "pipeline")]
pub use docforge_pipeline as pipeline;
