//! Static manufacturer and document-type detection patterns.
//!
//! Unlike the error-code, version, placeholder, and chunk-setting rules,
//! these are not part of the hot-reloadable JSON configuration (spec §6
//! names only four config files): manufacturer and document-type detection
//! are considered a fixed part of the classifier's own logic, compiled once
//! at process start the same way `docforge-config`'s regexes are.

use std::sync::LazyLock;

use regex::Regex;

/// One manufacturer's filename/content/model-series detection patterns.
pub struct ManufacturerPatterns {
    /// Manufacturer key, matching the keys used in the pattern config files.
    pub key: &'static str,
    /// Patterns tested against the lowercased filename.
    pub filename_patterns: Vec<Regex>,
    /// Patterns tested against lowercased content, each worth 0.3 per hit.
    pub content_patterns: Vec<Regex>,
    /// Model-series patterns tested against raw content, each worth 0.5 per hit.
    pub model_series_patterns: Vec<Regex>,
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid built-in pattern `{p}`: {e}")))
        .collect()
}

/// All known manufacturers, in a fixed evaluation order.
pub static MANUFACTURERS: LazyLock<Vec<ManufacturerPatterns>> = LazyLock::new(|| {
    vec![
        ManufacturerPatterns {
            key: "hp",
            filename_patterns: compile_all(&[r"^hp_", r"^hp-", r"_hp_"]),
            content_patterns: compile_all(&[
                r"\bhp\b",
                r"hewlett.*packard",
                r"hp\s+laserjet",
                r"hp\s+deskjet",
                r"hp\s+officejet",
                r"hp\s+photosmart",
                r"hp\s+enterprise",
                r"hp\s+designjet",
                r"hp\s+color",
            ]),
            model_series_patterns: compile_all(&[
                r"LaserJet\s+([A-Z0-9]+)",
                r"DeskJet\s+([A-Z0-9]+)",
                r"OfficeJet\s+([A-Z0-9]+)",
                r"Photosmart\s+([A-Z0-9]+)",
                r"Enterprise\s+([A-Z0-9]+)",
                r"DesignJet\s+([A-Z0-9]+)",
                r"Color\s+([A-Z0-9]+)",
                r"E\s*(\d+)",
                r"X\s*(\d+)",
                r"M\s*(\d+)",
                r"P\s*(\d+)",
            ]),
        },
        ManufacturerPatterns {
            key: "konica_minolta",
            filename_patterns: compile_all(&[r"^km_", r"^km-", r"_km_"]),
            content_patterns: compile_all(&[
                r"konica\s+minolta",
                r"km\s+[a-z0-9]+",
                r"minolta\s+[a-z0-9]+",
                r"bizhub",
                r"bizhub\s+[a-z0-9]+",
            ]),
            model_series_patterns: compile_all(&[
                r"BizHub\s+([A-Z0-9]+)",
                r"KM\s+([A-Z0-9]+)",
                r"C\s*(\d+[a-z]?)",
                r"P\s*(\d+[a-z]?)",
                r"(\d+[a-z]?)\s+series",
                r"(\d+[a-z]?)\s+model",
            ]),
        },
        ManufacturerPatterns {
            key: "lexmark",
            filename_patterns: compile_all(&[r"^lexmark_", r"^lexmark-", r"_lexmark_"]),
            content_patterns: compile_all(&[r"lexmark", r"lexmark\s+[a-z0-9]+"]),
            model_series_patterns: compile_all(&[
                r"Lexmark\s+([A-Z0-9]+)",
                r"MS\s*(\d+)",
                r"MX\s*(\d+)",
                r"CX\s*(\d+)",
                r"XC\s*(\d+)",
                r"MB\s*(\d+)",
                r"CS\s*(\d+[a-z]?)",
                r"C\s*(\d+[a-z]?)",
            ]),
        },
        ManufacturerPatterns {
            key: "utax",
            filename_patterns: compile_all(&[r"^utax_", r"^utax-", r"_utax_"]),
            content_patterns: compile_all(&[r"utax", r"utax\s+[a-z0-9]+"]),
            model_series_patterns: compile_all(&[
                r"UTAX\s+([A-Z0-9]+)",
                r"P-\s*(\d+[A-Z]+)",
                r"P-C\s*(\d+[A-Z]+)",
                r"(\d+[a-z]?)\s+ci",
                r"(\d+[a-z]?)\s+i",
            ]),
        },
    ]
});

/// One document type's filename/content detection patterns.
pub struct DocumentTypePatterns {
    /// Document type key, e.g. `"service_manual"`.
    pub key: &'static str,
    /// Substrings tested against the lowercased filename.
    pub filename_keywords: &'static [&'static str],
    /// Substrings tested (and counted) against lowercased content, 0.1 per count.
    pub content_keywords: &'static [&'static str],
    /// Patterns tested against lowercased content, each worth 0.2 per hit.
    pub content_patterns: Vec<Regex>,
}

/// All known document types, in a fixed evaluation order.
pub static DOCUMENT_TYPES: LazyLock<Vec<DocumentTypePatterns>> = LazyLock::new(|| {
    vec![
        DocumentTypePatterns {
            key: "service_manual",
            filename_keywords: &["sm", "service_manual", "maintenance_manual"],
            content_keywords: &[
                "service manual",
                "maintenance manual",
                "repair manual",
                "troubleshooting",
                "disassembly",
                "assembly",
                "calibration",
                "adjustment",
                "replacement",
                "error codes",
                "diagnostic",
                "preventive maintenance",
            ],
            content_patterns: compile_all(&[
                r"service\s+manual",
                r"maintenance\s+manual",
                r"repair\s+manual",
                r"troubleshooting\s+guide",
                r"chapter\s+\d+.*maintenance",
                r"section\s+\d+.*repair",
            ]),
        },
        DocumentTypePatterns {
            key: "parts_catalog",
            filename_keywords: &["parts", "catalog", "spare_parts"],
            content_keywords: &[
                "parts catalog",
                "spare parts",
                "replacement parts",
                "part number",
                "part list",
                "components",
                "accessories",
                "consumables",
                "order information",
            ],
            content_patterns: compile_all(&[
                r"parts\s+catalog",
                r"spare\s+parts",
                r"part\s+number.*\d+",
                r"ordering\s+information",
                r"price.*\$",
                r"quantity.*\d+",
            ]),
        },
        DocumentTypePatterns {
            key: "cpmd_database",
            filename_keywords: &["cpmd", "customer_parts"],
            content_keywords: &[
                "cpmd",
                "customer parts",
                "maintenance data",
                "error code",
                "solution steps",
                "field modification",
                "technical bulletin",
                "service bulletin",
                "parts cross-reference",
            ],
            content_patterns: compile_all(&[
                r"cpmd.*database",
                r"error\s+code.*\d+",
                r"solution\s+steps",
                r"field\s+modification",
                r"technical\s+bulletin",
            ]),
        },
        DocumentTypePatterns {
            key: "technical_bulletin",
            filename_keywords: &["technical", "bulletin", "bt", "troubleshooting"],
            content_keywords: &[
                "technical bulletin",
                "service bulletin",
                "field notice",
                "urgent",
                "critical",
                "immediate action",
                "bulletin number",
                "issue description",
                "resolution",
            ],
            content_patterns: compile_all(&[
                r"technical\s+bulletin",
                r"service\s+bulletin",
                r"field\s+notice",
                r"bulletin\s+number",
                r"urgent.*action",
            ]),
        },
    ]
});

static GENERAL_MODEL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"([A-Z]{2,4}\d{3,6}[A-Z]?)",
        r"([A-Z]+\d{3,6}[A-Z]?)",
        r"(\d{3,6}[A-Z]{2,4})",
        r"([A-Z]\d{3,6}[A-Z]?)",
    ])
});

/// Generic alphanumeric model-number patterns used as a manufacturer-agnostic
/// fallback (spec §4.6 step 1, §4.8 step 1).
#[must_use]
pub fn general_model_patterns() -> &'static [Regex] {
    &GENERAL_MODEL_PATTERNS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manufacturer_table_compiles_without_panicking() {
        assert_eq!(MANUFACTURERS.len(), 4);
    }

    #[test]
    fn document_type_table_compiles_without_panicking() {
        assert_eq!(DOCUMENT_TYPES.len(), 4);
    }
}
