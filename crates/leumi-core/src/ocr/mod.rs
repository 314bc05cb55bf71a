//! Document text recognition.
//!
//! The pipeline only needs "bytes in, text out". [`OcrService`] is the seam;
//! [`DocumentIntelligenceClient`] is the hosted implementation.

#[cfg(feature = "azure")]
mod azure;
mod layout;

#[cfg(feature = "azure")]
pub use azure::DocumentIntelligenceClient;
pub use layout::{AnalyzeResult, DocumentLine, DocumentPage, DocumentParagraph, KeyValuePair, TextSpan};

use crate::error::OcrError;

/// Result type for OCR operations.
pub type Result<T> = std::result::Result<T, OcrError>;

/// Turns a scanned document into plain text.
pub trait OcrService: Send + Sync {
    /// Recognize the text of `bytes`, declared as `content_type`
    /// (for example `application/pdf` or `image/png`).
    fn analyze(&self, bytes: &[u8], content_type: &str) -> Result<String>;
}

impl<T: OcrService + ?Sized> OcrService for Box<T> {
    fn analyze(&self, bytes: &[u8], content_type: &str) -> Result<String> {
        (**self).analyze(bytes, content_type)
    }
}

impl<T: OcrService + ?Sized> OcrService for std::sync::Arc<T> {
    fn analyze(&self, bytes: &[u8], content_type: &str) -> Result<String> {
        (**self).analyze(bytes, content_type)
    }
}

/// MIME type for a document file extension, if supported.
pub fn content_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "tif" | "tiff" => Some("image/tiff"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}
