//! Version extractor (C7, spec §4.7).

use docforge_config::CompiledVersionConfig;
use regex::Regex;

/// A version string extracted from text, with the confidence derived from
/// how early its winning category appears in the search order.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionMatch {
    /// Formatted version string.
    pub version: String,
    /// `1 - position_in_search_order * 0.1`, clamped to `[0, 1]`.
    pub confidence: f32,
}

/// Runs the ordered category search over `text`, returning the first
/// validated match.
#[must_use]
pub fn extract(text: &str, manufacturer: Option<&str>, config: &CompiledVersionConfig) -> Option<VersionMatch> {
    let search_order = config.search_order_for(manufacturer);

    for (position, category) in search_order.iter().enumerate() {
        let Some(patterns) = config.categories.get(category) else {
            continue;
        };
        for pattern in patterns {
            let Some(captures) = pattern.regex.captures(text) else {
                continue;
            };
            let formatted = format_output(&pattern.output_format, &captures);
            if !validate(&formatted, config) {
                continue;
            }
            let confidence = (1.0 - position as f32 * 0.1).clamp(0.0, 1.0);
            return Some(VersionMatch {
                version: formatted,
                confidence,
            });
        }
    }
    None
}

fn format_output(output_format: &str, captures: &regex::Captures<'_>) -> String {
    let group_count = captures.len().saturating_sub(1);
    match group_count {
        1 => output_format.replace("{version}", captures.get(1).map_or("", |m| m.as_str())),
        2 => output_format
            .replace("{edition}", captures.get(1).map_or("", |m| m.as_str()))
            .replace("{date}", captures.get(2).map_or("", |m| m.as_str())),
        _ => captures
            .iter()
            .skip(1)
            .filter_map(|m| m.map(|m| m.as_str()))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn validate(version: &str, config: &CompiledVersionConfig) -> bool {
    if version.is_empty() {
        return false;
    }
    let len = version.chars().count();
    if len < config.min_version_length || len > config.max_version_length {
        return false;
    }
    if let Ok(allowed) = Regex::new(&format!("^[{}]*$", config.allowed_characters))
        && !allowed.is_match(version)
    {
        return false;
    }
    for forbidden in &config.forbidden_patterns {
        if version.contains(forbidden.as_str()) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use docforge_config::{PatternConfigStore, write_minimal_fixture};

    fn config() -> std::sync::Arc<docforge_config::PatternSnapshot> {
        let dir = tempfile::tempdir().unwrap();
        write_minimal_fixture(dir.path()).unwrap();
        PatternConfigStore::load(dir.path()).unwrap().snapshot()
    }

    #[test]
    fn extracts_edition_date_pair_before_semver() {
        let snapshot = config();
        let result = extract(
            "Service Manual, Edition 3, 5/2024, v1.2.3",
            None,
            snapshot.versions(),
        )
        .expect("a version should match");
        assert_eq!(result.version, "3, 5/2024");
    }

    #[test]
    fn falls_back_to_later_category_with_lower_confidence() {
        let snapshot = config();
        let result = extract("firmware is v9.9.9 only", None, snapshot.versions())
            .expect("a version should match");
        assert_eq!(result.version, "9.9.9");
        assert!(result.confidence < 1.0);
    }

    #[test]
    fn no_version_present_returns_none() {
        let snapshot = config();
        assert!(extract("no version information here", None, snapshot.versions()).is_none());
    }
}
