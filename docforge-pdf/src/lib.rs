//! PDF text and image extraction (C2).
//!
//! `extract` pulls per-page text, delimited with `--- PAGE n ---` markers so
//! downstream chunkers can recover page boundaries, and every raster image
//! referenced from each page's `/Resources/XObject` dictionary, in document
//! order. A single page's extraction failing never aborts the document: its
//! text becomes empty and a warning is logged instead.

mod error;
mod model;
mod parser;

pub use error::{PdfError, Result};
pub use model::{ExtractedDocument, ExtractedImage};

/// Extracts text and images from the bytes of a PDF document.
pub fn extract(bytes: &[u8]) -> Result<ExtractedDocument> {
    parser::extract(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_rejects_non_pdf_bytes() {
        let result = extract(b"not-a-pdf");
        assert!(result.is_err());
    }
}
