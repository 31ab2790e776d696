//! Error types for the inference layer.

use thiserror::Error;

/// Errors that can occur while loading or querying a model capability.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// Failed to load or connect to the model.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// No loader is registered for the capability.
    #[error("capability not configured: {0}")]
    NotConfigured(String),

    /// The query itself failed (transport or model error).
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// The model answered with something we could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
