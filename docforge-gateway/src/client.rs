//! Typed HTTP client over the Ollama-shaped model runtime (C3, spec §4.3).
//!
//! Built the way the teacher's `openai::client` builds its typed client — a
//! config struct holding base URL and timeouts, `serde` request/response
//! structs, one method per operation — but over `reqwest` instead of the
//! teacher's in-house `zenwave` transport (not fetchable in this workspace;
//! recorded as a deliberate swap in `DESIGN.md`). Retries transport/5xx
//! failures up to `max_retries` times with exponential backoff; 4xx
//! surfaces immediately. Every operation is bounded by a per-operation-type
//! [`ConnectionPool`] so a burst of calls can't saturate the model host.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::config::GatewayConfig;
use crate::embedding::EmbeddingOutcome;
use crate::error::{GatewayError, Result};
use crate::pool::ConnectionPool;
use crate::wire::{EmbeddingRequest, EmbeddingResponse, GenerateRequest, GenerateResponse, GenerationOptions, TagsResponse};

/// Typed client for `generate`, `vision`, and `embed` against the model
/// runtime described in spec §6.
#[derive(Clone)]
pub struct ModelGateway {
    http: reqwest::Client,
    config: GatewayConfig,
    generate_pool: ConnectionPool,
    vision_pool: ConnectionPool,
    embed_pool: ConnectionPool,
}

async fn sleep_backoff(attempt: u32, initial: std::time::Duration) {
    let backoff = initial * 2u32.saturating_pow(attempt);
    tokio::time::sleep(backoff).await;
}

impl ModelGateway {
    /// Builds a gateway from `config`, allocating one connection pool per
    /// operation type.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            generate_pool: ConnectionPool::new("generate", config.max_concurrent_generate),
            vision_pool: ConnectionPool::new("vision", config.max_concurrent_vision),
            embed_pool: ConnectionPool::new("embed", config.max_concurrent_embed),
            config,
        }
    }

    /// Returns the configuration this gateway was built from, so callers
    /// can read the configured model names without holding their own copy.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Calls `GET /api/tags` and asserts that `required` model names are all
    /// present, matching the teacher prototype's startup connectivity check
    /// (`production_document_processor.py::_test_ollama_connection`).
    pub async fn assert_models_present(&self, required: &[&str]) -> Result<()> {
        let url = format!("{}/api/tags", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Transport(format!("GET /api/tags returned {}", response.status())));
        }

        let tags: TagsResponse = response.json().await.map_err(|e| GatewayError::Decode(e.to_string()))?;
        let available: Vec<&str> = tags.models.iter().map(|m| m.name.as_str()).collect();

        for model in required {
            if !available.iter().any(|name| name == model || name.starts_with(&format!("{model}:"))) {
                return Err(GatewayError::MissingModel((*model).to_string()));
            }
        }
        Ok(())
    }

    /// Generates text from `prompt` with `model` (spec §4.3 `generate`).
    /// Blocking up to [`GatewayConfig::generate_timeout`]; transport/5xx
    /// retried with exponential backoff, 4xx surfaced permanently.
    pub async fn generate(&self, model: &str, prompt: &str, options: GenerationOptions) -> Result<String> {
        let _permit = self.generate_pool.acquire().await;
        let body = GenerateRequest {
            model,
            prompt,
            stream: false,
            options,
            images: None,
        };
        let response = self.send_with_retry("/api/generate", &body, self.config.generate_timeout).await?;
        Ok(response.response)
    }

    /// Analyzes `image_bytes` with a vision model and `prompt` (spec §4.3
    /// `vision`). The image is base64-encoded into the same `/api/generate`
    /// request shape the generate endpoint uses, with an `images` array
    /// (`original_source/ollama/client.py::analyze_image`).
    pub async fn vision(&self, model: &str, prompt: &str, image_bytes: &[u8], options: GenerationOptions) -> Result<String> {
        let _permit = self.vision_pool.acquire().await;
        let encoded = BASE64.encode(image_bytes);
        let body = GenerateRequest {
            model,
            prompt,
            stream: false,
            options,
            images: Some(vec![encoded]),
        };
        let response = self.send_with_retry("/api/generate", &body, self.config.vision_timeout).await?;
        Ok(response.response)
    }

    /// Embeds `text` with `model` (spec §4.3 `embed`). On permanent failure
    /// after retries, returns a zero-vector of [`GatewayConfig::embedding_dim`]
    /// marked degraded instead of propagating an error — the caller decides
    /// whether to persist it (spec default: yes, flagged).
    pub async fn embed(&self, model: &str, text: &str) -> EmbeddingOutcome {
        let _permit = self.embed_pool.acquire().await;
        let body = EmbeddingRequest { model, prompt: text };

        match self.send_embedding_with_retry(&body).await {
            Ok(response) if response.embedding.len() == self.config.embedding_dim => EmbeddingOutcome::ok(response.embedding),
            Ok(response) => {
                tracing::warn!(
                    expected = self.config.embedding_dim,
                    got = response.embedding.len(),
                    "embedding dimension mismatch, treating as degraded"
                );
                EmbeddingOutcome::degraded(self.config.embedding_dim)
            }
            Err(error) => {
                tracing::warn!(%error, model, "embedding failed permanently, writing degraded vector");
                EmbeddingOutcome::degraded(self.config.embedding_dim)
            }
        }
    }

    async fn send_with_retry(&self, path: &str, body: &GenerateRequest<'_>, timeout: std::time::Duration) -> Result<GenerateResponse> {
        let url = format!("{}{path}", self.config.base_url);
        let mut attempt = 0;
        loop {
            let result = self
                .http
                .post(&url)
                .timeout(timeout)
                .json(body)
                .send()
                .await;

            match classify(result).await {
                Attempt::Success(response) => {
                    return response.json().await.map_err(|e| GatewayError::Decode(e.to_string()));
                }
                Attempt::Permanent(status, text) => return Err(GatewayError::Permanent { status, body: text }),
                Attempt::Retryable(message) => {
                    if attempt >= self.config.max_retries {
                        return Err(GatewayError::Transport(message));
                    }
                    tracing::warn!(attempt, %message, "model runtime call failed, retrying");
                    sleep_backoff(attempt, self.config.initial_backoff).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn send_embedding_with_retry(&self, body: &EmbeddingRequest<'_>) -> Result<EmbeddingResponse> {
        let url = format!("{}/api/embeddings", self.config.base_url);
        let mut attempt = 0;
        loop {
            let result = self
                .http
                .post(&url)
                .timeout(self.config.embed_timeout)
                .json(body)
                .send()
                .await;

            match classify(result).await {
                Attempt::Success(response) => {
                    return response.json().await.map_err(|e| GatewayError::Decode(e.to_string()));
                }
                Attempt::Permanent(status, text) => return Err(GatewayError::Permanent { status, body: text }),
                Attempt::Retryable(message) => {
                    if attempt >= self.config.max_retries {
                        return Err(GatewayError::Transport(message));
                    }
                    sleep_backoff(attempt, self.config.initial_backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}

enum Attempt {
    Success(reqwest::Response),
    Permanent(u16, String),
    Retryable(String),
}

async fn classify(result: std::result::Result<reqwest::Response, reqwest::Error>) -> Attempt {
    match result {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                Attempt::Success(response)
            } else if status.as_u16() >= 500 {
                let text = response.text().await.unwrap_or_default();
                Attempt::Retryable(format!("{status}: {text}"))
            } else {
                let text = response.text().await.unwrap_or_default();
                Attempt::Permanent(status.as_u16(), text)
            }
        }
        Err(error) => Attempt::Retryable(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(base_url: String) -> ModelGateway {
        let config = GatewayConfig::default().with_base_url(base_url).with_embedding_dim(4);
        ModelGateway::new(config)
    }

    #[tokio::test]
    async fn generate_returns_response_text_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "the fuser assembly is located behind panel B",
                "total_duration": 123,
                "eval_count": 42
            })))
            .mount(&server)
            .await;

        let gateway = gateway(server.uri());
        let text = gateway.generate("llama3.1:8b", "where is the fuser?", GenerationOptions::default()).await.unwrap();
        assert_eq!(text, "the fuser assembly is located behind panel B");
    }

    #[tokio::test]
    async fn embed_degrades_to_zero_vector_on_permanent_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embeddings"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let gateway = gateway(server.uri());
        let outcome = gateway.embed("nomic-embed-text", "some chunk text").await;
        assert!(outcome.degraded);
        assert_eq!(outcome.vector.len(), 4);
        assert!(outcome.vector.iter().all(|&v| v == 0.0));
    }

    #[tokio::test]
    async fn embed_returns_real_vector_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embedding": [0.1, 0.2, 0.3, 0.4]
            })))
            .mount(&server)
            .await;

        let gateway = gateway(server.uri());
        let outcome = gateway.embed("nomic-embed-text", "some chunk text").await;
        assert!(!outcome.degraded);
        assert_eq!(outcome.vector, vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[tokio::test]
    async fn assert_models_present_fails_when_a_required_model_is_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{"name": "llama3.1:8b"}]
            })))
            .mount(&server)
            .await;

        let gateway = gateway(server.uri());
        assert!(gateway.assert_models_present(&["llama3.1:8b"]).await.is_ok());
        assert!(gateway.assert_models_present(&["mistral:7b"]).await.is_err());
    }
}
