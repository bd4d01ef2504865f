use thiserror::Error;

/// Errors raised while classifying a document or extracting its metadata.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// A `validation_regex` in the pattern configuration itself failed to compile.
    ///
    /// Should not occur in practice: `docforge-config` validates every regex
    /// at load time, so a value reaching here has already been compiled once.
    #[error("invalid pattern encountered during classification: {0}")]
    Pattern(#[from] Box<regex::Error>),
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, ClassifyError>;
