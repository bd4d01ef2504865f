//! Hot-reloadable, validated pattern configuration (C1).
//!
//! Four JSON files on disk — error/part-number patterns, version patterns,
//! model placeholder patterns, and chunk settings — are loaded once at
//! startup into a [`PatternConfigStore`], which compiles every regex eagerly
//! and fails the load if any of them are malformed. Readers (the classifier,
//! chunker, and metadata extractors in the other docforge crates) hold onto
//! the store and call [`PatternConfigStore::snapshot`] to get an immutable,
//! internally-consistent view; [`PatternConfigStore::reload`] swaps in a
//! freshly validated snapshot atomically, so a reload never exposes a torn
//! mix of old and new patterns.

mod compiled;
mod error;
pub mod known_models;
mod schema;
mod store;

pub use compiled::{
    CompiledChunkConfig, CompiledCodeConfig, CompiledCodePatterns, CompiledPlaceholder,
    CompiledPlaceholderConfig, CompiledVersionConfig, CompiledVersionPattern, ResolvedChunkSettings,
};
pub use error::{ConfigError, Result};
pub use store::{PatternConfigStore, PatternSnapshot};

#[cfg(any(test, feature = "test-fixtures"))]
pub use store::write_minimal_fixture;
