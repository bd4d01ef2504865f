//! Validated, regex-compiled form of the raw JSON config. Built once at load
//! (and again, off to the side, on reload) and never mutated afterwards.

use std::collections::HashMap;

use regex::Regex;

use crate::error::{ConfigError, Result};
use crate::schema::{
    ChunkSettingsFile, ErrorCodeFile, PlaceholderFile, RawCodeExample, RawDocumentTypeOverride,
    RawManufacturerChunkOverride, VersionPatternsFile,
};

/// Compiled error-code or part-number patterns for one manufacturer.
#[derive(Debug, Clone)]
pub struct CompiledCodePatterns {
    /// Ordered candidate patterns run over document text.
    pub patterns: Vec<Regex>,
    /// Hard filter every match must additionally satisfy.
    pub validation_regex: Regex,
    /// Known code/part lookup table, keyed by exact matched text.
    pub examples: HashMap<String, RawCodeExample>,
}

/// Compiled `error_code_patterns.json` + nested `part_number_patterns`.
#[derive(Debug, Clone, Default)]
pub struct CompiledCodeConfig {
    /// Per-manufacturer error-code patterns.
    pub error_patterns: HashMap<String, CompiledCodePatterns>,
    /// Per-manufacturer part-number patterns.
    pub part_patterns: HashMap<String, CompiledCodePatterns>,
}

fn compile_code_patterns(
    manufacturer: &str,
    raw: &crate::schema::RawCodePatterns,
    file_label: &str,
) -> Result<CompiledCodePatterns> {
    let patterns = raw
        .patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|source| ConfigError::Regex {
                context: format!("{file_label}.{manufacturer}"),
                source: Box::new(source),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let validation_regex =
        Regex::new(&raw.validation_regex).map_err(|source| ConfigError::Regex {
            context: format!("{file_label}.{manufacturer}.validation_regex"),
            source: Box::new(source),
        })?;

    let examples = raw
        .examples
        .iter()
        .cloned()
        .map(|ex| (ex.code.clone(), ex))
        .collect();

    Ok(CompiledCodePatterns {
        patterns,
        validation_regex,
        examples,
    })
}

impl CompiledCodeConfig {
    pub(crate) fn compile(raw: &ErrorCodeFile) -> Result<Self> {
        let error_patterns = raw
            .error_code_patterns
            .iter()
            .map(|(m, p)| Ok((m.clone(), compile_code_patterns(m, p, "error_code_patterns")?)))
            .collect::<Result<_>>()?;
        let part_patterns = raw
            .part_number_patterns
            .iter()
            .map(|(m, p)| Ok((m.clone(), compile_code_patterns(m, p, "part_number_patterns")?)))
            .collect::<Result<_>>()?;
        Ok(Self {
            error_patterns,
            part_patterns,
        })
    }
}

/// One version pattern, compiled, paired with its output format template.
#[derive(Debug, Clone)]
pub struct CompiledVersionPattern {
    /// Compiled matcher.
    pub regex: Regex,
    /// `{version}` for single-group patterns, `{edition}, {date}` for two-group.
    pub output_format: String,
}

/// Compiled `version_patterns.json`.
#[derive(Debug, Clone)]
pub struct CompiledVersionConfig {
    /// Patterns grouped by category name (`edition_date`, `generic_semver`, …).
    pub categories: HashMap<String, Vec<CompiledVersionPattern>>,
    /// Default search order across categories.
    pub search_order: Vec<String>,
    /// Per-manufacturer category reordering.
    pub manufacturer_preferred: HashMap<String, Vec<String>>,
    /// Minimum accepted formatted-version length.
    pub min_version_length: usize,
    /// Maximum accepted formatted-version length.
    pub max_version_length: usize,
    /// Allowed character set, as a literal character class body.
    pub allowed_characters: String,
    /// Substrings that immediately disqualify a candidate.
    pub forbidden_patterns: Vec<String>,
}

impl CompiledVersionConfig {
    pub(crate) fn compile(raw: &VersionPatternsFile) -> Result<Self> {
        let vp = &raw.version_patterns;
        let categories = vp
            .patterns
            .iter()
            .map(|(cat, entries)| {
                let compiled = entries
                    .patterns
                    .iter()
                    .map(|e| {
                        Ok(CompiledVersionPattern {
                            regex: Regex::new(&e.pattern).map_err(|source| ConfigError::Regex {
                                context: format!("version_patterns.{cat}"),
                                source: Box::new(source),
                            })?,
                            output_format: e.output_format.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok((cat.clone(), compiled))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        for category in &vp.extraction_settings.search_order {
            if !categories.contains_key(category) {
                return Err(ConfigError::UndefinedVersionCategory(category.clone()));
            }
        }

        let manufacturer_preferred = vp
            .manufacturer_specific
            .iter()
            .map(|(m, prefs)| (m.clone(), prefs.preferred_patterns.clone()))
            .collect();

        Ok(Self {
            categories,
            search_order: vp.extraction_settings.search_order.clone(),
            manufacturer_preferred,
            min_version_length: vp.validation.min_version_length,
            max_version_length: vp.validation.max_version_length,
            allowed_characters: vp.validation.allowed_characters.clone(),
            forbidden_patterns: vp.validation.forbidden_patterns.clone(),
        })
    }

    /// Category search order for `manufacturer`, falling back to the default
    /// order when no manufacturer-specific preference is configured.
    #[must_use]
    pub fn search_order_for(&self, manufacturer: Option<&str>) -> Vec<String> {
        if let Some(m) = manufacturer
            && let Some(preferred) = self.manufacturer_preferred.get(m)
            && !preferred.is_empty()
        {
            let mut order = preferred.clone();
            for cat in &self.search_order {
                if !order.contains(cat) {
                    order.push(cat.clone());
                }
            }
            return order;
        }
        self.search_order.clone()
    }
}

/// One placeholder example, compiled.
#[derive(Debug, Clone)]
pub struct CompiledPlaceholder {
    /// Placeholder token, e.g. `"Cxx0i"`.
    pub placeholder: String,
    /// Compiled matcher for the placeholder shape.
    pub regex: Regex,
    /// Owning manufacturer key.
    pub manufacturer: String,
    /// Owning series label.
    pub series: String,
    /// Concrete models this placeholder expands to, when known up front.
    pub actual_models: Vec<String>,
}

/// Compiled `model_placeholder_patterns.json`.
#[derive(Debug, Clone, Default)]
pub struct CompiledPlaceholderConfig {
    /// All placeholders, flattened across placeholder "types".
    pub placeholders: Vec<CompiledPlaceholder>,
}

impl CompiledPlaceholderConfig {
    pub(crate) fn compile(raw: &PlaceholderFile) -> Result<Self> {
        let mut placeholders = Vec::new();
        for (type_name, ty) in &raw.model_placeholder_patterns.placeholder_types {
            for example in &ty.examples {
                let regex = Regex::new(&example.pattern).map_err(|source| ConfigError::Regex {
                    context: format!("model_placeholder_patterns.{type_name}.{}", example.placeholder),
                    source: Box::new(source),
                })?;
                placeholders.push(CompiledPlaceholder {
                    placeholder: example.placeholder.clone(),
                    regex,
                    manufacturer: example.manufacturer.clone(),
                    series: example.series.clone(),
                    actual_models: example.actual_models.clone(),
                });
            }
        }
        Ok(Self { placeholders })
    }

    /// Placeholders declared for `manufacturer`.
    #[must_use]
    pub fn for_manufacturer<'a>(&'a self, manufacturer: &'a str) -> impl Iterator<Item = &'a CompiledPlaceholder> {
        self.placeholders
            .iter()
            .filter(move |p| p.manufacturer == manufacturer)
    }
}

/// Chunking strategy + size knobs after the document-type/manufacturer
/// override cascade (spec §4.10) has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChunkSettings {
    /// Which [`crate`] strategy name to run (`contextual_chunking`, `service_manual`, …).
    pub strategy: String,
    /// Target chunk size in words.
    pub chunk_size: usize,
    /// Word overlap between adjacent chunks.
    pub chunk_overlap: usize,
}

/// Compiled `chunk_settings.json`.
#[derive(Debug, Clone)]
pub struct CompiledChunkConfig {
    default_strategy: String,
    strategies: HashMap<String, crate::schema::RawStrategySettings>,
    document_type_specific: HashMap<String, RawDocumentTypeOverride>,
    manufacturer_specific: HashMap<String, RawManufacturerChunkOverride>,
}

impl CompiledChunkConfig {
    pub(crate) fn compile(raw: &ChunkSettingsFile) -> Result<Self> {
        Ok(Self {
            default_strategy: raw.chunk_settings.default_strategy.clone(),
            strategies: raw.chunk_settings.strategies.clone(),
            document_type_specific: raw.chunk_settings.document_type_specific.clone(),
            manufacturer_specific: raw.chunk_settings.manufacturer_specific.clone(),
        })
    }

    /// Resolves the effective strategy + sizing for `(document_type, manufacturer)`,
    /// applying the override cascade: document-type override, then
    /// manufacturer override, then the configured default.
    #[must_use]
    pub fn resolve(&self, document_type: &str, manufacturer: Option<&str>) -> ResolvedChunkSettings {
        let mut strategy_name = self.default_strategy.clone();

        if let Some(doc_override) = self.document_type_specific.get(document_type) {
            if let Some(s) = doc_override.strategy.clone().or_else(|| doc_override.preferred_strategy.clone()) {
                strategy_name = s;
            }
        } else if let Some(m) = manufacturer
            && let Some(manu_override) = self.manufacturer_specific.get(m)
            && let Some(s) = &manu_override.preferred_strategy
        {
            strategy_name = s.clone();
        }

        let base = self
            .strategies
            .get(&strategy_name)
            .cloned()
            .unwrap_or_else(|| crate::schema::RawStrategySettings {
                chunk_size: 500,
                chunk_overlap: 50,
                strategy: strategy_name.clone(),
            });

        let mut chunk_size = base.chunk_size;
        let mut chunk_overlap = base.chunk_overlap;

        if let Some(doc_override) = self.document_type_specific.get(document_type) {
            if let Some(size) = doc_override.chunk_size {
                chunk_size = size;
            }
            if let Some(overlap) = doc_override.chunk_overlap {
                chunk_overlap = overlap;
            }
        }

        if let Some(m) = manufacturer
            && let Some(manu_override) = self.manufacturer_specific.get(m)
            && let Some(multiplier) = manu_override.chunk_size_multiplier
        {
            chunk_size = ((chunk_size as f32) * multiplier).round().max(1.0) as usize;
        }

        ResolvedChunkSettings {
            strategy: base.strategy,
            chunk_size,
            chunk_overlap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RawChunkSettings, RawStrategySettings};
    use std::collections::HashMap as Map;

    fn sample_chunk_config() -> CompiledChunkConfig {
        let mut strategies = Map::new();
        strategies.insert(
            "contextual_chunking".to_string(),
            RawStrategySettings {
                chunk_size: 500,
                chunk_overlap: 50,
                strategy: "contextual_chunking".to_string(),
            },
        );
        strategies.insert(
            "bulletin".to_string(),
            RawStrategySettings {
                chunk_size: 300,
                chunk_overlap: 30,
                strategy: "bulletin".to_string(),
            },
        );

        let mut document_type_specific = Map::new();
        document_type_specific.insert(
            "technical_bulletin".to_string(),
            RawDocumentTypeOverride {
                strategy: Some("bulletin".to_string()),
                preferred_strategy: None,
                chunk_size: None,
                chunk_overlap: None,
            },
        );

        let mut manufacturer_specific = Map::new();
        manufacturer_specific.insert(
            "konica_minolta".to_string(),
            RawManufacturerChunkOverride {
                preferred_strategy: None,
                chunk_size_multiplier: Some(1.5),
            },
        );

        CompiledChunkConfig {
            default_strategy: "contextual_chunking".to_string(),
            strategies,
            document_type_specific,
            manufacturer_specific,
        }
    }

    #[test]
    fn document_type_override_wins_over_manufacturer() {
        let cfg = sample_chunk_config();
        let resolved = cfg.resolve("technical_bulletin", Some("konica_minolta"));
        assert_eq!(resolved.strategy, "bulletin");
    }

    #[test]
    fn manufacturer_multiplier_applies_to_default_strategy() {
        let cfg = sample_chunk_config();
        let resolved = cfg.resolve("service_manual", Some("konica_minolta"));
        assert_eq!(resolved.strategy, "contextual_chunking");
        assert_eq!(resolved.chunk_size, 750);
    }

    #[test]
    fn falls_back_to_default_with_no_overrides() {
        let cfg = sample_chunk_config();
        let resolved = cfg.resolve("user_manual", None);
        assert_eq!(resolved.strategy, "contextual_chunking");
        assert_eq!(resolved.chunk_size, 500);
        assert_eq!(resolved.chunk_overlap, 50);
    }
}
