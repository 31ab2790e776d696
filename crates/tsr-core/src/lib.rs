//! Core library for term sheet review.
//!
//! This crate provides:
//! - The twelve-field term sheet catalog and mock value table
//! - Field extraction through a mock table or a document question-answering model
//! - Rule-based term validation (dates, monetary amounts, free text) and scoring
//! - The extract → validate pipeline and the persisted document snapshot

pub mod catalog;
pub mod context;
pub mod error;
pub mod extract;
pub mod media;
pub mod models;
pub mod pipeline;
pub mod snapshot;
pub mod validate;

pub use catalog::{NOT_SPECIFIED, TERM_SHEET_FIELDS};
pub use context::ModelContext;
pub use error::{Result, TsrError};
pub use extract::{ExtractionStrategy, FieldExtractor};
pub use media::DocumentImage;
pub use models::document::{Document, DocumentKind, DocumentStatus};
pub use models::config::TsrConfig;
pub use models::field::DocumentField;
pub use pipeline::TermSheetPipeline;
pub use snapshot::SnapshotStore;
pub use validate::{FieldKind, TermValidator, validate_terms, validation_score};

/// Re-export capability types.
pub use tsr_inference::{Answer, ConfidenceScorer, DocumentQuery, ModelLoadingState, QueryOptions};
