//! The [`Embedding`] entity.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A dense vector produced by an embedding model for a single chunk.
///
/// At most one row exists per `(chunk_id, model_name)`; `vector.len()` must
/// equal the advertised dimension for `model_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// Stable identifier.
    pub id: Uuid,
    /// Chunk this embedding was computed from.
    pub chunk_id: Uuid,
    /// Dense vector, `f32` components.
    pub vector: Vec<f32>,
    /// Name of the embedding model, e.g. `"nomic-embed-text"`.
    pub model_name: String,
    /// Model version/tag, when the gateway reports one.
    pub model_version: String,
    /// Set when the vector is a zero-fill placeholder written after the
    /// embedding call failed permanently; downstream retrieval should ignore
    /// degraded rows.
    pub degraded: bool,
    /// Creation timestamp.
    pub created_at: OffsetDateTime,
}

impl Embedding {
    /// Creates a normal (non-degraded) embedding row.
    #[must_use]
    pub fn new(chunk_id: Uuid, vector: Vec<f32>, model_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            chunk_id,
            vector,
            model_name: model_name.into(),
            model_version: String::new(),
            degraded: false,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Creates a degraded, zero-filled embedding row of the given dimension,
    /// written when the gateway exhausts retries for this chunk.
    #[must_use]
    pub fn degraded(chunk_id: Uuid, dim: usize, model_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            chunk_id,
            vector: vec![0.0; dim],
            model_name: model_name.into(),
            model_version: String::new(),
            degraded: true,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_embedding_is_zero_filled_and_flagged() {
        let chunk_id = Uuid::new_v4();
        let embedding = Embedding::degraded(chunk_id, 768, "nomic-embed-text");
        assert_eq!(embedding.vector.len(), 768);
        assert!(embedding.vector.iter().all(|&v| v == 0.0));
        assert!(embedding.degraded);
    }
}
