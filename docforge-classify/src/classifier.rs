//! Document classifier (C6, spec §4.6): filename pass, content pass, hybrid
//! merge, confidence boost.

use docforge_config::PatternSnapshot;
use docforge_core::document::DocumentType;

use crate::model_extract;
use crate::patterns::{DOCUMENT_TYPES, MANUFACTURERS};
use crate::version;

/// One pass's (filename-only or content-only) classification signal.
#[derive(Debug, Clone, Default)]
struct PassResult {
    manufacturer: Option<String>,
    manufacturer_confidence: f32,
    document_type: DocumentType,
    document_type_confidence: f32,
    models: Vec<String>,
    version: Option<String>,
}

/// Final classification for one document (spec §4.6 output).
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Winning document type.
    pub document_type: DocumentType,
    /// Confidence in `document_type`, in `[0, 1]`.
    pub document_type_confidence: f32,
    /// Winning manufacturer key, if any.
    pub manufacturer: Option<String>,
    /// Confidence in `manufacturer`, in `[0, 1]`.
    pub manufacturer_confidence: f32,
    /// Detected series label, if any.
    pub series: Option<String>,
    /// Confidence in `series`, in `[0, 1]`.
    pub series_confidence: f32,
    /// Union of models found across both passes.
    pub models: Vec<String>,
    /// Extracted version string, if any.
    pub version: Option<String>,
    /// Confidence in `version`.
    pub version_confidence: f32,
    /// Overall confidence after the agreement boost (spec §4.6 step 4).
    pub hybrid_confidence: f32,
}

fn document_type_from_key(key: &str) -> DocumentType {
    match key {
        "service_manual" => DocumentType::ServiceManual,
        "parts_catalog" => DocumentType::PartsCatalog,
        "cpmd_database" => DocumentType::CpmdDatabase,
        "technical_bulletin" => DocumentType::TechnicalBulletin,
        "user_manual" => DocumentType::UserManual,
        _ => DocumentType::Unknown,
    }
}

fn filename_pass(filename: &str, snapshot: &PatternSnapshot) -> PassResult {
    let lower = filename.to_lowercase();
    let mut result = PassResult::default();

    for manufacturer in MANUFACTURERS.iter() {
        if manufacturer.filename_patterns.iter().any(|p| p.is_match(&lower)) {
            result.manufacturer = Some(manufacturer.key.to_string());
            result.manufacturer_confidence = 0.9;
            break;
        }
    }

    for doc_type in DOCUMENT_TYPES.iter() {
        if doc_type.filename_keywords.iter().any(|kw| lower.contains(kw)) {
            result.document_type = document_type_from_key(doc_type.key);
            result.document_type_confidence = 0.8;
            break;
        }
    }

    result.models = model_extract::extract_candidates(filename, result.manufacturer.as_deref());
    result.version = version::extract(filename, result.manufacturer.as_deref(), snapshot.versions())
        .map(|v| v.version);

    result
}

fn content_pass(text: &str, snapshot: &PatternSnapshot) -> PassResult {
    let lower = text.to_lowercase();
    let mut result = PassResult::default();

    let mut best_manufacturer: Option<(&str, f32)> = None;
    for manufacturer in MANUFACTURERS.iter() {
        let mut score = 0.0;
        for pattern in &manufacturer.content_patterns {
            score += pattern.find_iter(&lower).count() as f32 * 0.3;
        }
        for pattern in &manufacturer.model_series_patterns {
            score += pattern.find_iter(text).count() as f32 * 0.5;
        }
        if best_manufacturer.is_none_or(|(_, best)| score > best) {
            best_manufacturer = Some((manufacturer.key, score));
        }
    }
    if let Some((key, score)) = best_manufacturer
        && score > 0.0
    {
        result.manufacturer = Some(key.to_string());
        result.manufacturer_confidence = (score / 5.0).min(1.0);
    }

    let mut best_type: Option<(&str, f32)> = None;
    for doc_type in DOCUMENT_TYPES.iter() {
        let mut score = 0.0;
        for keyword in doc_type.content_keywords {
            score += lower.matches(keyword).count() as f32 * 0.1;
        }
        for pattern in &doc_type.content_patterns {
            score += pattern.find_iter(&lower).count() as f32 * 0.2;
        }
        if best_type.is_none_or(|(_, best)| score > best) {
            best_type = Some((doc_type.key, score));
        }
    }
    if let Some((key, score)) = best_type
        && score > 0.0
    {
        result.document_type = document_type_from_key(key);
        result.document_type_confidence = (score / 10.0).min(1.0);
    }

    result.models = model_extract::extract_candidates(text, result.manufacturer.as_deref());
    result.version = version::extract(text, result.manufacturer.as_deref(), snapshot.versions())
        .map(|v| v.version);

    result
}

fn hybrid_merge(filename: &PassResult, content: Option<&PassResult>) -> (Option<String>, f32, DocumentType, f32, Vec<String>, Option<String>, f32) {
    let (manufacturer, manufacturer_confidence) = if filename.manufacturer_confidence >= 0.8 {
        (filename.manufacturer.clone(), filename.manufacturer_confidence)
    } else if let Some(c) = content
        && c.manufacturer_confidence > 0.0
    {
        (c.manufacturer.clone(), c.manufacturer_confidence)
    } else {
        (filename.manufacturer.clone(), filename.manufacturer_confidence)
    };

    let (document_type, document_type_confidence) = if filename.document_type_confidence >= 0.8 {
        (filename.document_type, filename.document_type_confidence)
    } else if let Some(c) = content
        && c.document_type_confidence > 0.0
    {
        (c.document_type, c.document_type_confidence)
    } else {
        (filename.document_type, filename.document_type_confidence)
    };

    let mut models: Vec<String> = filename.models.clone();
    if let Some(c) = content {
        for m in &c.models {
            if !models.contains(m) {
                models.push(m.clone());
            }
        }
    }

    let (version, version_confidence) = if let Some(v) = content.and_then(|c| c.version.clone()) {
        (Some(v), 0.8)
    } else if let Some(v) = filename.version.clone() {
        (Some(v), 0.6)
    } else {
        (None, 0.0)
    };

    (
        manufacturer,
        manufacturer_confidence,
        document_type,
        document_type_confidence,
        models,
        version,
        version_confidence,
    )
}

fn confidence_boost(filename: &PassResult, content: Option<&PassResult>, manufacturer_confidence: f32, document_type_confidence: f32, models: &[String], version: &Option<String>) -> f32 {
    let mut base = (manufacturer_confidence + document_type_confidence) / 2.0;

    if let Some(c) = content {
        let manufacturer_agree = filename.manufacturer == c.manufacturer;
        let type_agree = filename.document_type == c.document_type;
        if manufacturer_agree && type_agree {
            base = (base * 1.2).min(1.0);
        } else if manufacturer_agree || type_agree {
            base = (base * 1.1).min(1.0);
        }
    }

    if !models.is_empty() {
        base = (base * 1.1).min(1.0);
    }
    if version.is_some() {
        base = (base * 1.1).min(1.0);
    }

    base
}

fn detect_series(filename: &str, text: &str, manufacturer: Option<&str>) -> (Option<String>, f32) {
    let Some(manufacturer) = manufacturer else {
        return (None, 0.0);
    };
    let lower_text = text.to_lowercase();
    let lower_filename = filename.to_lowercase();
    let haystacks = [lower_text.as_str(), lower_filename.as_str()];

    let candidates: &[(&str, &str)] = match manufacturer {
        "hp" => &[
            ("laserjet pro", "LaserJet Pro"),
            ("deskjet", "DeskJet"),
            ("officejet", "OfficeJet"),
        ],
        "konica_minolta" => &[("bizhub", "BizHub")],
        "lexmark" => &[("cx", "CX Series")],
        "utax" => &[("ci", "Ci Series")],
        _ => &[],
    };

    for (needle, label) in candidates {
        if haystacks.iter().any(|h| h.contains(needle)) {
            return (Some((*label).to_string()), 0.9);
        }
    }
    (None, 0.0)
}

/// Runs the full C6 classification algorithm over `filename` and `text`.
#[must_use]
pub fn classify(filename: &str, text: &str, snapshot: &PatternSnapshot) -> Classification {
    let filename_result = filename_pass(filename, snapshot);
    let content_result = if text.trim().is_empty() {
        None
    } else {
        Some(content_pass(text, snapshot))
    };

    let (manufacturer, manufacturer_confidence, document_type, document_type_confidence, models, version, version_confidence) =
        hybrid_merge(&filename_result, content_result.as_ref());

    let hybrid_confidence = confidence_boost(
        &filename_result,
        content_result.as_ref(),
        manufacturer_confidence,
        document_type_confidence,
        &models,
        &version,
    );

    let (series, series_confidence) = detect_series(filename, text, manufacturer.as_deref());

    Classification {
        document_type,
        document_type_confidence,
        manufacturer,
        manufacturer_confidence,
        series,
        series_confidence,
        models,
        version,
        version_confidence,
        hybrid_confidence,
    }
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
    fn filename_alone_identifies_hp_service_manual() {
        let snapshot = snapshot();
        let result = classify("hp_E786_SM.pdf", "", &snapshot);
        assert_eq!(result.manufacturer.as_deref(), Some("hp"));
        assert_eq!(result.document_type, DocumentType::ServiceManual);
    }

    #[test]
    fn content_detects_konica_minolta_bizhub_series() {
        let snapshot = snapshot();
        let text = "Konica Minolta bizhub C454 Service Manual. Troubleshooting and disassembly steps follow.";
        let result = classify("document.pdf", text, &snapshot);
        assert_eq!(result.manufacturer.as_deref(), Some("konica_minolta"));
        assert_eq!(result.series.as_deref(), Some("BizHub"));
    }

    #[test]
    fn empty_content_and_filename_yields_unknown() {
        let snapshot = snapshot();
        let result = classify("document.pdf", "", &snapshot);
        assert_eq!(result.document_type, DocumentType::Unknown);
        assert!(result.manufacturer.is_none());
    }

    #[test]
    fn agreement_between_passes_boosts_confidence() {
        let snapshot = snapshot();
        let text = "HP LaserJet service manual troubleshooting disassembly repair manual steps";
        let result = classify("hp_sm.pdf", text, &snapshot);
        assert!(result.hybrid_confidence > result.manufacturer_confidence.min(result.document_type_confidence));
    }
}
