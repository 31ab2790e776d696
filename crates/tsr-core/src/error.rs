//! Error types for the tsr-core library.

use thiserror::Error;

/// Main error type for the tsr library.
#[derive(Error, Debug)]
pub enum TsrError {
    /// Snapshot (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the uploaded document image.
#[derive(Error, Debug)]
pub enum ImageError {
    /// The string is not a `data:` URL.
    #[error("malformed data URL: {0}")]
    MalformedDataUrl(String),

    /// The data URL payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The bytes could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The document has no content.
    #[error("document is empty")]
    Empty,
}

/// Errors related to term validation and scoring.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Scoring requires at least one field.
    #[error("cannot score an empty field set")]
    EmptyFieldSet,
}

/// Catastrophic failures of the extract → validate pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The document image could not be read.
    #[error("unreadable document: {0}")]
    Image(#[from] ImageError),
}

/// Errors raised when editing a document.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DocumentError {
    /// No field with the given id or label.
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Result type for the tsr library.
pub type Result<T> = std::result::Result<T, TsrError>;
