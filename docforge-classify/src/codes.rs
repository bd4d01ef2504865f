//! Error-code and part-number extractor (C9, spec §4.9).

use docforge_config::CompiledCodePatterns;
use docforge_core::codes::{ExtractedCode, ExtractedPart};

fn extract_generic(text: &str, manufacturer: &str, patterns: &CompiledCodePatterns) -> Vec<(String, String, String)> {
    let mut seen = std::collections::BTreeSet::new();
    let mut out = Vec::new();

    for pattern in &patterns.patterns {
        for captures in pattern.captures_iter(text) {
            let Some(token) = captures.get(1).or_else(|| captures.get(0)) else {
                continue;
            };
            let token = token.as_str();
            if !patterns.validation_regex.is_match(token) {
                continue;
            }
            if !seen.insert(token.to_string()) {
                continue;
            }
            let (description, category) = patterns
                .examples
                .get(token)
                .map(|ex| (ex.description.clone(), ex.category.clone()))
                .unwrap_or_else(|| ("Unknown".to_string(), "unknown".to_string()));
            out.push((token.to_string(), description, category));
        }
    }

    let _ = manufacturer;
    out
}

/// Extracts error codes for `manufacturer`, validated and deduplicated.
#[must_use]
pub fn extract_error_codes(text: &str, manufacturer: &str, snapshot: &docforge_config::PatternSnapshot) -> Vec<ExtractedCode> {
    let Some(patterns) = snapshot.error_patterns(manufacturer) else {
        return Vec::new();
    };
    extract_generic(text, manufacturer, patterns)
        .into_iter()
        .map(|(code, description, category)| ExtractedCode {
            code,
            description,
            category,
            manufacturer: manufacturer.to_string(),
        })
        .collect()
}

/// Extracts part numbers for `manufacturer`, validated and deduplicated.
#[must_use]
pub fn extract_part_numbers(text: &str, manufacturer: &str, snapshot: &docforge_config::PatternSnapshot) -> Vec<ExtractedPart> {
    let Some(patterns) = snapshot.part_patterns(manufacturer) else {
        return Vec::new();
    };
    extract_generic(text, manufacturer, patterns)
        .into_iter()
        .map(|(part_number, description, category)| ExtractedPart {
            part_number,
            description,
            category,
            manufacturer: manufacturer.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docforge_config::{PatternConfigStore, write_minimal_fixture};

    fn snapshot() -> std::sync::Arc<docforge_config::PatternSnapshot> {
        let dir = tempfile::tempdir().unwrap();
        write_minimal_fixture(dir.path()).unwrap();
        PatternConfigStore::load(dir.path()).unwrap().snapshot()
    }

    #[test]
    fn extracts_known_hp_error_code_with_description() {
        let snapshot = snapshot();
        let codes = extract_error_codes("Error 13.20.01 occurred during printing", "hp", &snapshot);
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].code, "13.20.01");
        assert_eq!(codes[0].description, "paper jam");
    }

    #[test]
    fn unmatched_validation_regex_is_dropped() {
        let snapshot = snapshot();
        let codes = extract_error_codes("Error 999.99.99 is not a real HP code", "hp", &snapshot);
        assert!(codes.is_empty());
    }

    #[test]
    fn duplicate_matches_are_deduped() {
        let snapshot = snapshot();
        let codes = extract_error_codes("Error 13.20.01 repeated: Error 13.20.01 again", "hp", &snapshot);
        assert_eq!(codes.len(), 1);
    }

    #[test]
    fn unknown_manufacturer_returns_empty() {
        let snapshot = snapshot();
        assert!(extract_error_codes("anything", "acme", &snapshot).is_empty());
    }
}
