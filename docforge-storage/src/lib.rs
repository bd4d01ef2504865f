//! Storage adapters for the docforge ingestion pipeline (C4 + C5).
//!
//! One crate, two modules, mirroring the teacher's idiom of aggregating
//! several external-service adapters behind a single crate boundary rather
//! than splitting each into its own path dependency:
//!
//! - [`objects`] — content-addressed object storage (C4, spec §4.4).
//! - [`relational`] — pooled Postgres-compatible persistence with a
//!   pgvector-style vector column (C5, spec §4.5).
//!
//! The orchestrator (`docforge-pipeline`) never issues raw HTTP or SQL
//! itself; every I/O call for documents, chunks, embeddings, and images goes
//! through the typed operations here.

pub mod error;
pub mod objects;
pub mod relational;

pub use error::{Result, StorageError};
pub use objects::{BucketSpec, ObjectStore, UploadResult};
pub use relational::{PoolConfig, RelationalStore, vector_literal};
