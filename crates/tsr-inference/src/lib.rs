//! Model capability abstraction layer for tsr.
//!
//! This crate defines the two capabilities the term sheet pipeline can use
//! when a model is available:
//! - [`DocumentQuery`]: answer a natural-language question about a document image
//! - [`ConfidenceScorer`]: report a confidence for an extracted value
//!
//! Capabilities are loaded lazily through [`Capability`], which records an
//! explicit [`ModelLoadingState`]. With the `http` feature, backends that call
//! hosted inference endpoints are available.

mod backend;
mod capability;
mod error;

pub use backend::{Answer, ConfidenceScorer, DocumentQuery, QueryOptions};
pub use capability::{Capability, Loader, ModelLoadingState};
pub use error::InferenceError;

#[cfg(feature = "http")]
pub use backend::http::{HttpConfidenceScorer, HttpDocumentQuery};

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
