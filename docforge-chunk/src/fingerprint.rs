//! Content fingerprinting for deduplication and change detection.

use sha1::{Digest, Sha1};

/// Hex-encoded SHA-1 digest of `text`, used as a chunk's fingerprint.
///
/// Callers must pass already-normalized text (trimmed, whitespace-collapsed)
/// so that two chunks with merely different incidental whitespace still hash
/// identically.
#[must_use]
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_hashes_identically() {
        assert_eq!(content_hash("hello world"), content_hash("hello world"));
    }

    #[test]
    fn different_text_hashes_differently() {
        assert_ne!(content_hash("hello world"), content_hash("goodbye world"));
    }

    #[test]
    fn produces_forty_hex_characters() {
        let hash = content_hash("anything");
        assert_eq!(hash.len(), 40);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
