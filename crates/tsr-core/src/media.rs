//! Uploaded document content.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::error::ImageError;

/// An uploaded document: raw bytes plus their media type.
///
/// Images are decoded for verification; other document formats (PDF, Word,
/// ...) are passed through to the extraction capability untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentImage {
    bytes: Vec<u8>,
    media_type: String,
}

impl DocumentImage {
    /// Wrap raw bytes with an explicit media type.
    pub fn from_bytes(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }

    /// Parse a `data:<media type>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| ImageError::MalformedDataUrl("missing data: prefix".to_string()))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ImageError::MalformedDataUrl("missing payload separator".to_string()))?;

        let media_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| ImageError::MalformedDataUrl("only base64 payloads are supported".to_string()))?;

        let media_type = if media_type.is_empty() {
            "application/octet-stream"
        } else {
            media_type
        };

        let bytes = STANDARD.decode(payload.trim())?;
        debug!("Decoded data URL: {} ({} bytes)", media_type, bytes.len());

        Ok(Self::from_bytes(bytes, media_type))
    }

    /// Read a document from disk, guessing the media type from its extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(bytes, media_type_for_path(path)))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    /// Encode back into a data URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.bytes))
    }

    /// Check that the content is readable.
    ///
    /// Returns the pixel dimensions for images and `None` for other formats.
    pub fn verify(&self) -> Result<Option<(u32, u32)>, ImageError> {
        if self.bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        if !self.is_image() {
            return Ok(None);
        }

        let decoded = image::load_from_memory(&self.bytes)?;
        let dimensions = (decoded.width(), decoded.height());
        debug!("Verified image {}x{}", dimensions.0, dimensions.1);

        Ok(Some(dimensions))
    }
}

/// Media type for the file kinds accepted on upload.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "csv" => "text/csv",
        "txt" => "text/plain",
        "eml" => "message/rfc822",
        "msg" => "application/vnd.ms-outlook",
        _ => "application/octet-stream",
    }
}
