/// A raster image extracted from a page's `/Resources/XObject` dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    /// 1-based source page this image appeared on.
    pub page: usize,
    /// Zero-based index of this image within its page, in document order.
    pub index: usize,
    /// Raw encoded image bytes (JPEG for `DCTDecode`, PNG-wrappable raw
    /// samples for `FlateDecode`).
    pub bytes: Vec<u8>,
    /// Pixel width, from the XObject's `/Width`.
    pub width: u32,
    /// Pixel height, from the XObject's `/Height`.
    pub height: u32,
    /// Colorspace name (`DeviceGray`, `DeviceRGB`, `DeviceCMYK`, `Indexed`, or `unknown`).
    pub colorspace: String,
}

/// Result of extracting one PDF's text and images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// Concatenated per-page text, each page preceded by a `--- PAGE n ---`
    /// delimiter so downstream chunkers can recover page boundaries.
    pub text: String,
    /// Total page count in the source PDF.
    pub pages: usize,
    /// Images in document order.
    pub images: Vec<ExtractedImage>,
}
