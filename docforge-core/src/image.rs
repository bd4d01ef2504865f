//! The [`Image`] entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A raster image extracted from a document page.
///
/// Unique per `(document_id, page_number, image_index)`; content-addressed
/// on the object store via `file_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning document.
    pub document_id: Uuid,
    /// 1-based page number the image was extracted from.
    pub page_number: u32,
    /// Index of this image within its page, in document order.
    pub image_index: u32,
    /// Object-store URL.
    pub storage_url: String,
    /// SHA-256 of the raw image bytes.
    pub file_hash: String,
    /// Pixel width, when known.
    pub width: u32,
    /// Pixel height, when known.
    pub height: u32,
    /// Colorspace label, e.g. `"DeviceRGB"`.
    pub colorspace: String,
    /// Size of the raw image bytes.
    pub size_bytes: u64,
    /// Vision-model description, set once `process_images` analyzes it.
    pub ai_description: Option<String>,
}

impl Image {
    /// Creates an image row before it has been uploaded or described.
    #[must_use]
    pub fn new(
        document_id: Uuid,
        page_number: u32,
        image_index: u32,
        file_hash: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            page_number,
            image_index,
            storage_url: String::new(),
            file_hash: file_hash.into(),
            width: 0,
            height: 0,
            colorspace: String::new(),
            size_bytes,
            ai_description: None,
        }
    }
}
