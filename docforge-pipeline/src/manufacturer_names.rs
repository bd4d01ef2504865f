//! Display-name lookup for the manufacturer keys the classifier resolves
//! (spec §3: `Manufacturer.display_name`), grounded on the same four
//! manufacturers `docforge-classify`'s `patterns.rs` detects.

/// Maps a classifier manufacturer key to its human-readable display name,
/// falling back to a title-cased rendering of the key itself for any
/// manufacturer the static pattern table doesn't yet know about.
#[must_use]
pub(crate) fn display_name(key: &str) -> String {
    match key {
        "hp" => "HP".to_string(),
        "konica_minolta" => "Konica Minolta".to_string(),
        "lexmark" => "Lexmark".to_string(),
        "utax" => "UTAX".to_string(),
        other => other
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_manufacturers_use_their_canonical_display_name() {
        assert_eq!(display_name("hp"), "HP");
        assert_eq!(display_name("konica_minolta"), "Konica Minolta");
        assert_eq!(display_name("utax"), "UTAX");
    }

    #[test]
    fn unknown_manufacturer_falls_back_to_title_case() {
        assert_eq!(display_name("ricoh_group"), "Ricoh Group");
    }
}
