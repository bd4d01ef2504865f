//! Typed HTTP client for the external model runtime (C3, spec §4.3).
//!
//! Three operations — `generate`, `vision`, `embed` — over the Ollama-shaped
//! REST surface described in spec §6: `POST /api/generate`,
//! `POST /api/embeddings`, `GET /api/tags`. Retries transport/5xx failures
//! with exponential backoff, surfaces 4xx immediately, and bounds global
//! in-flight calls per operation type with a [`pool::ConnectionPool`].

mod client;
pub mod config;
pub mod embedding;
mod error;
mod pool;
mod wire;

pub use client::ModelGateway;
pub use config::GatewayConfig;
pub use embedding::EmbeddingOutcome;
pub use error::{GatewayError, Result};
pub use pool::ConnectionPool;
pub use wire::GenerationOptions;
