//! The [`EmbeddingOutcome`] returned by [`crate::client::ModelGateway::embed`].

/// Result of an embedding call. `degraded` is set when the call failed
/// permanently after retries and `vector` is a zero-fill placeholder of the
/// advertised dimension instead (spec §4.3, glossary "Degraded embedding").
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingOutcome {
    /// The embedding vector, or a zero-filled placeholder if `degraded`.
    pub vector: Vec<f32>,
    /// `true` if this is a zero-fill placeholder rather than a real embedding.
    pub degraded: bool,
}

impl EmbeddingOutcome {
    /// Wraps a real embedding vector.
    #[must_use]
    pub const fn ok(vector: Vec<f32>) -> Self {
        Self { vector, degraded: false }
    }

    /// Builds a degraded, zero-filled outcome of `dim` length.
    #[must_use]
    pub fn degraded(dim: usize) -> Self {
        Self {
            vector: vec![0.0; dim],
            degraded: true,
        }
    }
}
