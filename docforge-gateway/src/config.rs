//! Gateway configuration, materialized once from environment variables into
//! a concrete record type (spec §9: "materialize as explicit record types
//! built once from the... source, not as string-keyed bags passed through
//! the pipeline").

use std::time::Duration;

/// Configuration for a [`crate::client::ModelGateway`], built once at
/// construction time from `OLLAMA_BASE_URL`, `LLM_MODEL`, `VISION_MODEL`,
/// `EMBEDDING_MODEL`, and `MAX_CONCURRENT` (spec §6).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the model runtime, e.g. `http://localhost:11434`.
    pub base_url: String,
    /// Default text-generation model.
    pub generate_model: String,
    /// Default vision-analysis model.
    pub vision_model: String,
    /// Default embedding model.
    pub embedding_model: String,
    /// Dimension advertised by `embedding_model`; degraded embeddings are
    /// zero-filled to this length.
    pub embedding_dim: usize,
    /// Timeout for `generate` calls (spec §4.3 default: 120s).
    pub generate_timeout: Duration,
    /// Timeout for `vision` calls (spec §4.3 default: 60s).
    pub vision_timeout: Duration,
    /// Timeout for `embed` calls (spec §4.3 default: 30s).
    pub embed_timeout: Duration,
    /// Max in-flight `generate` calls (spec §4.3 default: 3).
    pub max_concurrent_generate: usize,
    /// Max in-flight `vision` calls.
    pub max_concurrent_vision: usize,
    /// Max in-flight `embed` calls.
    pub max_concurrent_embed: usize,
    /// Retry attempts for transport/5xx failures (spec §4.3: 3).
    pub max_retries: u32,
    /// Initial backoff before the first retry (spec §4.3: 1s, doubling).
    pub initial_backoff: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            generate_model: "llama3.1:8b".to_string(),
            vision_model: "llava:7b".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            embedding_dim: 768,
            generate_timeout: Duration::from_secs(120),
            vision_timeout: Duration::from_secs(60),
            embed_timeout: Duration::from_secs(30),
            max_concurrent_generate: 3,
            max_concurrent_vision: 3,
            max_concurrent_embed: 3,
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl GatewayConfig {
    /// Starts from [`Default::default`] and overlays `OLLAMA_BASE_URL`,
    /// `LLM_MODEL`, `VISION_MODEL`, `EMBEDDING_MODEL`, and `MAX_CONCURRENT`
    /// when present in the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("OLLAMA_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.generate_model = model;
        }
        if let Ok(model) = std::env::var("VISION_MODEL") {
            config.vision_model = model;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.embedding_model = model;
        }
        if let Ok(max) = std::env::var("MAX_CONCURRENT")
            && let Ok(max) = max.parse::<usize>()
        {
            config.max_concurrent_generate = max;
            config.max_concurrent_vision = max;
            config.max_concurrent_embed = max;
        }
        config
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the advertised embedding dimension.
    #[must_use]
    pub const fn with_embedding_dim(mut self, dim: usize) -> Self {
        self.embedding_dim = dim;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_timeouts() {
        let config = GatewayConfig::default();
        assert_eq!(config.generate_timeout, Duration::from_secs(120));
        assert_eq!(config.vision_timeout, Duration::from_secs(60));
        assert_eq!(config.embed_timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
    }
}
