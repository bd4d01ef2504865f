//! Extracted service error codes and part numbers.

use serde::{Deserialize, Serialize};

/// A manufacturer error code found in a document's text, validated against
/// that manufacturer's `validation_regex`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedCode {
    /// The matched, validated code text, e.g. `"13.20.01"`.
    pub code: String,
    /// Human-readable description, or `"Unknown"` on a lookup miss.
    pub description: String,
    /// Category label, e.g. `"paper_jam"`, or `"unknown"`.
    pub category: String,
    /// Manufacturer key this pattern set belongs to.
    pub manufacturer: String,
}

/// A manufacturer part number found in a document's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPart {
    /// The matched, validated part number, e.g. `"C4127-60001"`.
    pub part_number: String,
    /// Human-readable description, or `"Unknown"` on a lookup miss.
    pub description: String,
    /// Category label, or `"unknown"`.
    pub category: String,
    /// Manufacturer key this pattern set belongs to.
    pub manufacturer: String,
}
