//! Raw `serde` mirrors of the four JSON config files (spec §6). These are
//! intentionally dumb deserialize targets; [`crate::compiled`] turns them
//! into validated, regex-compiled snapshots.

use std::collections::HashMap;

use serde::Deserialize;

// ---- error_code_patterns.json ---------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ErrorCodeFile {
    pub error_code_patterns: HashMap<String, RawCodePatterns>,
    #[serde(default)]
    pub part_number_patterns: HashMap<String, RawCodePatterns>,
}

#[derive(Debug, Deserialize)]
pub struct RawCodePatterns {
    pub patterns: Vec<String>,
    pub validation_regex: String,
    #[serde(default)]
    pub examples: Vec<RawCodeExample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCodeExample {
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

// ---- version_patterns.json -------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VersionPatternsFile {
    pub version_patterns: RawVersionPatterns,
}

#[derive(Debug, Deserialize)]
pub struct RawVersionPatterns {
    pub patterns: HashMap<String, RawVersionCategory>,
    pub extraction_settings: RawExtractionSettings,
    #[serde(default)]
    pub manufacturer_specific: HashMap<String, RawManufacturerVersionPrefs>,
    pub validation: RawVersionValidation,
}

#[derive(Debug, Deserialize)]
pub struct RawVersionCategory {
    pub patterns: Vec<RawVersionPatternEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVersionPatternEntry {
    pub pattern: String,
    pub output_format: String,
}

#[derive(Debug, Deserialize)]
pub struct RawExtractionSettings {
    pub search_order: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawManufacturerVersionPrefs {
    #[serde(default)]
    pub preferred_patterns: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawVersionValidation {
    pub min_version_length: usize,
    pub max_version_length: usize,
    pub allowed_characters: String,
    #[serde(default)]
    pub forbidden_patterns: Vec<String>,
}

// ---- model_placeholder_patterns.json --------------------------------------

#[derive(Debug, Deserialize)]
pub struct PlaceholderFile {
    pub model_placeholder_patterns: RawPlaceholderPatterns,
}

#[derive(Debug, Deserialize)]
pub struct RawPlaceholderPatterns {
    pub placeholder_types: HashMap<String, RawPlaceholderType>,
}

#[derive(Debug, Deserialize)]
pub struct RawPlaceholderType {
    pub examples: Vec<RawPlaceholderExample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlaceholderExample {
    pub placeholder: String,
    pub pattern: String,
    pub manufacturer: String,
    #[serde(default)]
    pub series: String,
    #[serde(default)]
    pub actual_models: Vec<String>,
}

// ---- chunk_settings.json ---------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChunkSettingsFile {
    pub chunk_settings: RawChunkSettings,
}

#[derive(Debug, Deserialize)]
pub struct RawChunkSettings {
    pub default_strategy: String,
    pub strategies: HashMap<String, RawStrategySettings>,
    #[serde(default)]
    pub document_type_specific: HashMap<String, RawDocumentTypeOverride>,
    #[serde(default)]
    pub manufacturer_specific: HashMap<String, RawManufacturerChunkOverride>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStrategySettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub strategy: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocumentTypeOverride {
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub preferred_strategy: Option<String>,
    #[serde(default)]
    pub chunk_size: Option<usize>,
    #[serde(default)]
    pub chunk_overlap: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawManufacturerChunkOverride {
    #[serde(default)]
    pub preferred_strategy: Option<String>,
    #[serde(default)]
    pub chunk_size_multiplier: Option<f32>,
}
