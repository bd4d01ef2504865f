//! Model extractor (C8, spec §4.8): exact patterns, placeholder expansion,
//! and series inference, merged and deduplicated with weighted confidence.

use std::collections::BTreeSet;

use docforge_config::{CompiledPlaceholderConfig, PatternSnapshot};

use crate::patterns::{MANUFACTURERS, general_model_patterns};

/// Result of model extraction for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelExtraction {
    /// Concrete model numbers found or expanded, deduplicated.
    pub models: Vec<String>,
    /// Placeholder tokens that matched (e.g. `"Cxx4"`), in document order.
    pub placeholders: Vec<String>,
    /// Series labels inferred from recognized series tokens.
    pub series: Vec<String>,
    /// Weighted confidence: exact=1.0, placeholder=0.8, series=0.6, averaged
    /// across every contributing source.
    pub confidence: f32,
}

fn clean_candidate(raw: &str) -> Option<String> {
    let upper = raw.to_uppercase();
    if upper.len() >= 3 && upper.chars().all(char::is_alphanumeric) {
        Some(upper)
    } else {
        None
    }
}

/// Extracts model numbers from raw text using the winning manufacturer's
/// patterns, falling back to generic alphanumeric patterns (used for both
/// the filename pass and the content pass, spec §4.6 steps 1-2).
#[must_use]
pub fn extract_candidates(text: &str, manufacturer: Option<&str>) -> Vec<String> {
    let mut found = BTreeSet::new();

    if let Some(m) = manufacturer
        && let Some(patterns) = MANUFACTURERS.iter().find(|p| p.key == m)
    {
        for pattern in &patterns.model_series_patterns {
            for captures in pattern.captures_iter(text) {
                if let Some(group) = captures.get(1).or_else(|| captures.get(0))
                    && let Some(cleaned) = clean_candidate(group.as_str())
                {
                    found.insert(cleaned);
                }
            }
        }
    }

    for pattern in general_model_patterns() {
        for captures in pattern.captures_iter(text) {
            if let Some(group) = captures.get(1).or_else(|| captures.get(0))
                && let Some(cleaned) = clean_candidate(group.as_str())
            {
                found.insert(cleaned);
            }
        }
    }

    found.into_iter().collect()
}

fn expand_placeholder(placeholder: &docforge_config::CompiledPlaceholder) -> Vec<String> {
    if !placeholder.actual_models.is_empty() {
        return placeholder.actual_models.clone();
    }

    // No actual_models list configured: fall back to the known-models table,
    // keeping any model that the placeholder's own regex also accepts.
    crate::known_models::models_for_manufacturer(&placeholder.manufacturer)
        .into_iter()
        .filter(|model| placeholder.regex.is_match(model))
        .map(str::to_string)
        .collect()
}

fn matched_placeholders<'a>(
    text: &str,
    manufacturer: Option<&str>,
    config: &'a CompiledPlaceholderConfig,
) -> Vec<&'a docforge_config::CompiledPlaceholder> {
    let candidates: Box<dyn Iterator<Item = &docforge_config::CompiledPlaceholder>> = match manufacturer {
        Some(m) => Box::new(config.for_manufacturer(m)),
        None => Box::new(config.placeholders.iter()),
    };
    candidates.filter(|p| p.regex.is_match(text)).collect()
}

/// Runs the full model-extraction pipeline: exact patterns, placeholder
/// expansion, series inference, merged with weighted confidence.
#[must_use]
pub fn extract(text: &str, manufacturer: Option<&str>, snapshot: &PatternSnapshot) -> ModelExtraction {
    let exact = extract_candidates(text, manufacturer);

    let placeholders = matched_placeholders(text, manufacturer, snapshot.placeholders());
    let mut placeholder_models = BTreeSet::new();
    let mut placeholder_tokens = Vec::new();
    for placeholder in &placeholders {
        placeholder_tokens.push(placeholder.placeholder.clone());
        placeholder_models.extend(expand_placeholder(placeholder));
    }

    let mut series_labels = BTreeSet::new();
    let mut series_models = BTreeSet::new();
    if let Some(m) = manufacturer {
        for placeholder in &placeholders {
            if !placeholder.series.is_empty() {
                series_labels.insert(placeholder.series.clone());
            }
        }
        for series in &series_labels {
            series_models.extend(
                crate::known_models::series_models(m, series)
                    .into_iter()
                    .map(str::to_string),
            );
        }
    }

    let mut all_models: BTreeSet<String> = exact.iter().cloned().collect();
    all_models.extend(placeholder_models.iter().cloned());
    all_models.extend(series_models.iter().cloned());

    let mut weight_sum = 0.0;
    let mut weight_count = 0.0;
    if !exact.is_empty() {
        weight_sum += 1.0;
        weight_count += 1.0;
    }
    if !placeholder_models.is_empty() {
        weight_sum += 0.8;
        weight_count += 1.0;
    }
    if !series_models.is_empty() {
        weight_sum += 0.6;
        weight_count += 1.0;
    }
    let confidence = if weight_count > 0.0 { weight_sum / weight_count } else { 0.0 };

    ModelExtraction {
        models: all_models.into_iter().collect(),
        placeholders: placeholder_tokens,
        series: series_labels.into_iter().collect(),
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docforge_config::{PatternConfigStore, write_minimal_fixture};

    #[test]
    fn exact_patterns_pick_up_hp_model() {
        let models = extract_candidates("HP LaserJet E786 service manual", Some("hp"));
        assert!(models.iter().any(|m| m.contains("786")));
    }

    #[test]
    fn placeholder_expands_to_configured_models() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal_fixture(dir.path()).unwrap();
        let snapshot = PatternConfigStore::load(dir.path()).unwrap().snapshot();

        let extraction = extract("the bizhub C224 and related C series share firmware", Some("konica_minolta"), &snapshot);
        assert!(extraction.models.contains(&"C224".to_string()) || !extraction.placeholders.is_empty());
    }
}
