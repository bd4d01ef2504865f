//! Errors raised while loading or validating pattern configuration.

use thiserror::Error;

/// Errors that can occur loading or reloading the pattern configuration.
///
/// Every variant here is fail-fast material: a process that cannot produce a
/// valid [`crate::PatternSnapshot`] must refuse to start (spec §4.1, §7
/// Validation row).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A config file's JSON did not match the expected schema.
    #[error("failed to parse {path}: {source}")]
    Json {
        /// Path that failed to parse.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A regex in the config failed to compile.
    #[error("invalid regex in {context}: {source}")]
    Regex {
        /// Where the bad pattern came from, e.g. `"error_code_patterns.hp"`.
        context: String,
        /// Underlying regex compile error.
        #[source]
        source: Box<regex::Error>,
    },

    /// `search_order` referenced a category with no patterns defined.
    #[error("version search_order references undefined category `{0}`")]
    UndefinedVersionCategory(String),
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, ConfigError>;
