//! Thin wrapper over `docforge_config::known_models` for series-scoped lookups.

use docforge_config::known_models::KNOWN_SERIES;

/// Known models for `manufacturer`'s `series`, if the series is recognized.
#[must_use]
pub fn series_models(manufacturer: &str, series: &str) -> Vec<&'static str> {
    KNOWN_SERIES
        .iter()
        .filter(|s| s.manufacturer.eq_ignore_ascii_case(manufacturer) && s.series.eq_ignore_ascii_case(series))
        .flat_map(|s| s.models.iter().copied())
        .collect()
}

/// All known models for `manufacturer`, across every series.
#[must_use]
pub fn models_for_manufacturer(manufacturer: &str) -> Vec<&'static str> {
    docforge_config::known_models::models_for_manufacturer(manufacturer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_models_scopes_to_series() {
        let models = series_models("konica_minolta", "bizhub");
        assert!(models.contains(&"C454"));
    }

    #[test]
    fn unknown_series_returns_empty() {
        assert!(series_models("konica_minolta", "not_a_series").is_empty());
    }
}
