//! The hot-reloadable pattern configuration store (spec §4.1, C1).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::compiled::{
    CompiledChunkConfig, CompiledCodeConfig, CompiledPlaceholderConfig, CompiledVersionConfig,
    ResolvedChunkSettings,
};
use crate::error::{ConfigError, Result};
use crate::schema::{ChunkSettingsFile, ErrorCodeFile, PlaceholderFile, VersionPatternsFile};

const ERROR_CODE_FILE: &str = "error_code_patterns.json";
const VERSION_PATTERNS_FILE: &str = "version_patterns.json";
const PLACEHOLDER_FILE: &str = "model_placeholder_patterns.json";
const CHUNK_SETTINGS_FILE: &str = "chunk_settings.json";

/// An immutable, fully-validated snapshot of all four pattern config files.
///
/// A [`PatternConfigStore`] atomically swaps one of these in on reload; no
/// reader ever observes a torn mix of old and new files.
#[derive(Debug, Clone)]
pub struct PatternSnapshot {
    /// Monotonically increasing snapshot id, bumped on every successful load.
    pub generation: u64,
    codes: CompiledCodeConfig,
    versions: CompiledVersionConfig,
    placeholders: CompiledPlaceholderConfig,
    chunks: CompiledChunkConfig,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.display().to_string(),
        source,
    })
}

impl PatternSnapshot {
    fn load_from(dir: &Path, generation: u64) -> Result<Self> {
        let error_codes: ErrorCodeFile = read_json(&dir.join(ERROR_CODE_FILE))?;
        let versions: VersionPatternsFile = read_json(&dir.join(VERSION_PATTERNS_FILE))?;
        let placeholders: PlaceholderFile = read_json(&dir.join(PLACEHOLDER_FILE))?;
        let chunks: ChunkSettingsFile = read_json(&dir.join(CHUNK_SETTINGS_FILE))?;

        Ok(Self {
            generation,
            codes: CompiledCodeConfig::compile(&error_codes)?,
            versions: CompiledVersionConfig::compile(&versions)?,
            placeholders: CompiledPlaceholderConfig::compile(&placeholders)?,
            chunks: CompiledChunkConfig::compile(&chunks)?,
        })
    }

    /// Compiled error-code and part-number patterns.
    #[must_use]
    pub fn codes(&self) -> &CompiledCodeConfig {
        &self.codes
    }

    /// Compiled version extraction patterns.
    #[must_use]
    pub fn versions(&self) -> &CompiledVersionConfig {
        &self.versions
    }

    /// Compiled model placeholder patterns.
    #[must_use]
    pub fn placeholders(&self) -> &CompiledPlaceholderConfig {
        &self.placeholders
    }

    /// Resolves chunking strategy + sizing for `(document_type, manufacturer)`.
    #[must_use]
    pub fn chunk_settings(&self, document_type: &str, manufacturer: Option<&str>) -> ResolvedChunkSettings {
        self.chunks.resolve(document_type, manufacturer)
    }

    /// Error-code patterns for one manufacturer, if configured.
    #[must_use]
    pub fn error_patterns(&self, manufacturer: &str) -> Option<&crate::compiled::CompiledCodePatterns> {
        self.codes.error_patterns.get(manufacturer)
    }

    /// Part-number patterns for one manufacturer, if configured.
    #[must_use]
    pub fn part_patterns(&self, manufacturer: &str) -> Option<&crate::compiled::CompiledCodePatterns> {
        self.codes.part_patterns.get(manufacturer)
    }

    /// All manufacturers with error-code patterns configured.
    #[must_use]
    pub fn known_manufacturers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.codes.error_patterns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// Hot-reloadable, atomically-swapped pattern configuration.
///
/// Holds an [`ArcSwap`] over a [`PatternSnapshot`]; [`PatternConfigStore::reload`]
/// compiles an entirely new snapshot off to the side and only swaps the
/// pointer in once it has validated clean, so in-flight readers always see
/// either the whole old snapshot or the whole new one (spec §4.1, §8).
#[derive(Debug)]
pub struct PatternConfigStore {
    dir: PathBuf,
    current: ArcSwap<PatternSnapshot>,
}

impl PatternConfigStore {
    /// Loads all four config files from `dir`, compiling and validating every
    /// regex eagerly. Fails fast: any malformed file or invalid pattern
    /// aborts the load instead of producing a partially-usable store.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let snapshot = PatternSnapshot::load_from(&dir, 0)?;
        Ok(Self {
            dir,
            current: ArcSwap::from_pointee(snapshot),
        })
    }

    /// Re-reads all four files from the original directory and, if they
    /// validate cleanly, atomically swaps them in as the new current
    /// snapshot. On any failure the existing snapshot is left untouched and
    /// the error is returned to the caller.
    pub fn reload(&self) -> Result<()> {
        let next_generation = self.current.load().generation + 1;
        let snapshot = PatternSnapshot::load_from(&self.dir, next_generation)?;
        self.current.store(Arc::new(snapshot));
        tracing::info!(generation = next_generation, dir = %self.dir.display(), "pattern config reloaded");
        Ok(())
    }

    /// Returns the current snapshot. Cheap: clones an `Arc`, not the data.
    #[must_use]
    pub fn snapshot(&self) -> Arc<PatternSnapshot> {
        self.current.load_full()
    }

    /// Directory this store loads from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Builds a minimal set of four valid pattern config files on disk, suitable
/// for tests that need a real [`PatternConfigStore`] without shipping fixture
/// files alongside the crate.
#[cfg(any(test, feature = "test-fixtures"))]
pub fn write_minimal_fixture(dir: &Path) -> std::io::Result<()> {
    let error_codes = serde_json::json!({
        "error_code_patterns": {
            "hp": {
                "patterns": [r"\b(?:Error|E)\s?(\d{2}\.\d{2}(?:\.\d{2})?)\b"],
                "validation_regex": r"^\d{2}\.\d{2}(\.\d{2})?$",
                "examples": [{"code": "13.20.01", "description": "paper jam", "category": "jam"}]
            }
        },
        "part_number_patterns": {
            "hp": {
                "patterns": [r"\b(CF\d{3}[A-Z]?)\b"],
                "validation_regex": r"^CF\d{3}[A-Z]?$",
                "examples": [{"code": "CF259X", "description": "toner cartridge", "category": "consumable"}]
            }
        }
    });

    let versions = serde_json::json!({
        "version_patterns": {
            "patterns": {
                "edition_date": {
                    "patterns": [{
                        "pattern": r"Edition\s+(\d+),\s+(\d{1,2}/\d{4})",
                        "output_format": "{edition}, {date}"
                    }]
                },
                "generic_semver": {
                    "patterns": [{
                        "pattern": r"\bv(\d+\.\d+\.\d+)\b",
                        "output_format": "{version}"
                    }]
                }
            },
            "extraction_settings": {
                "search_order": ["edition_date", "generic_semver"]
            },
            "manufacturer_specific": {},
            "validation": {
                "min_version_length": 1,
                "max_version_length": 40,
                "allowed_characters": "A-Za-z0-9., /",
                "forbidden_patterns": []
            }
        }
    });

    let placeholders = serde_json::json!({
        "model_placeholder_patterns": {
            "placeholder_types": {
                "bizhub_c_series": {
                    "examples": [{
                        "placeholder": "Cxx4",
                        "pattern": r"bizhub\s+C(\d)(\d)4",
                        "manufacturer": "konica_minolta",
                        "series": "bizhub",
                        "actual_models": ["C224", "C284", "C364", "C454", "C554"]
                    }]
                }
            }
        }
    });

    let chunks = serde_json::json!({
        "chunk_settings": {
            "default_strategy": "contextual_chunking",
            "strategies": {
                "contextual_chunking": {"chunk_size": 500, "chunk_overlap": 50, "strategy": "contextual_chunking"},
                "service_manual": {"chunk_size": 800, "chunk_overlap": 80, "strategy": "service_manual"},
                "bulletin": {"chunk_size": 300, "chunk_overlap": 30, "strategy": "bulletin"},
                "generic": {"chunk_size": 500, "chunk_overlap": 50, "strategy": "generic"}
            },
            "document_type_specific": {
                "service_manual": {"strategy": "service_manual"},
                "technical_bulletin": {"strategy": "bulletin"}
            },
            "manufacturer_specific": {}
        }
    });

    std::fs::write(dir.join(ERROR_CODE_FILE), serde_json::to_vec_pretty(&error_codes)?)?;
    std::fs::write(dir.join(VERSION_PATTERNS_FILE), serde_json::to_vec_pretty(&versions)?)?;
    std::fs::write(dir.join(PLACEHOLDER_FILE), serde_json::to_vec_pretty(&placeholders)?)?;
    std::fs::write(dir.join(CHUNK_SETTINGS_FILE), serde_json::to_vec_pretty(&chunks)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_then_reload_bumps_generation() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal_fixture(dir.path()).unwrap();

        let store = PatternConfigStore::load(dir.path()).unwrap();
        assert_eq!(store.snapshot().generation, 0);

        store.reload().unwrap();
        assert_eq!(store.snapshot().generation, 1);
    }

    #[test]
    fn reload_with_broken_json_leaves_old_snapshot_in_place() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal_fixture(dir.path()).unwrap();
        let store = PatternConfigStore::load(dir.path()).unwrap();

        std::fs::write(dir.path().join(ERROR_CODE_FILE), "{ not json").unwrap();
        let err = store.reload();
        assert!(err.is_err());
        assert_eq!(store.snapshot().generation, 0);
    }

    #[test]
    fn error_patterns_resolve_for_known_manufacturer() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal_fixture(dir.path()).unwrap();
        let store = PatternConfigStore::load(dir.path()).unwrap();
        let snapshot = store.snapshot();

        let hp = snapshot.error_patterns("hp").expect("hp patterns configured");
        assert_eq!(hp.patterns.len(), 1);
        assert!(hp.validation_regex.is_match("13.20.01"));
    }

    #[test]
    fn chunk_settings_resolve_applies_document_type_override() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal_fixture(dir.path()).unwrap();
        let store = PatternConfigStore::load(dir.path()).unwrap();

        let resolved = store.snapshot().chunk_settings("service_manual", None);
        assert_eq!(resolved.strategy, "service_manual");
        assert_eq!(resolved.chunk_size, 800);
    }

    #[test]
    fn missing_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let result = PatternConfigStore::load(dir.path());
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
