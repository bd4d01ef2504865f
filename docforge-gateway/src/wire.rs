//! Wire shapes for the Ollama-compatible REST surface (spec §6).

use serde::{Deserialize, Serialize};

/// Sampling knobs passed through to `/api/generate` (spec §4.3 `options`).
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOptions {
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Nucleus sampling threshold.
    pub top_p: f32,
    /// Repetition penalty.
    pub repeat_penalty: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
            top_p: 0.9,
            repeat_penalty: 1.1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: GenerationOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub total_duration: u64,
    #[serde(default)]
    pub eval_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct EmbeddingRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EmbeddingResponse {
    #[serde(default)]
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TagsResponse {
    #[serde(default)]
    pub models: Vec<TagEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TagEntry {
    pub name: String,
}
