//! Rule-based validation of extracted term sheet fields.

pub mod amounts;
pub mod consistency;
pub mod dates;
pub mod patterns;

pub use amounts::{is_valid_amount, parse_amount};
pub use consistency::check_consistency;
pub use dates::is_valid_date;

use std::sync::Arc;

use tracing::{debug, warn};
use tsr_inference::ConfidenceScorer;

use crate::catalog::NOT_SPECIFIED;
use crate::error::ValidationError;
use crate::models::field::DocumentField;

/// Default confidence a scorer must exceed for free-text values.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.8;

/// Rule family applied to a field, chosen from its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Label mentions "date".
    Date,
    /// Label mentions "amount" or "valuation".
    Amount,
    /// Anything else.
    Text,
}

impl FieldKind {
    /// Classify a label. Matching is case-insensitive and the first rule wins.
    pub fn for_label(label: &str) -> Self {
        let label = label.to_lowercase();

        if label.contains("date") {
            Self::Date
        } else if label.contains("amount") || label.contains("valuation") {
            Self::Amount
        } else {
            Self::Text
        }
    }
}

/// Validator that marks each field valid or invalid.
pub struct TermValidator {
    scorer: Option<Arc<dyn ConfidenceScorer>>,
    confidence_threshold: f32,
}

impl TermValidator {
    /// Create a purely rule-based validator.
    pub fn new() -> Self {
        Self {
            scorer: None,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    /// Use a confidence scorer for free-text fields.
    pub fn with_scorer(mut self, scorer: Option<Arc<dyn ConfidenceScorer>>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Set the confidence a scorer must exceed.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Return a copy of `fields` with `valid` recomputed for each field.
    ///
    /// Ids, labels, values and order are preserved.
    pub fn validate(&self, fields: &[DocumentField]) -> Vec<DocumentField> {
        fields
            .iter()
            .map(|field| DocumentField {
                valid: self.is_valid(field),
                ..field.clone()
            })
            .collect()
    }

    /// Apply the rule for a single field.
    pub fn is_valid(&self, field: &DocumentField) -> bool {
        match FieldKind::for_label(&field.label) {
            FieldKind::Date => is_valid_date(&field.value),
            FieldKind::Amount => is_valid_amount(&field.value),
            FieldKind::Text => self.is_valid_text(field),
        }
    }

    fn is_valid_text(&self, field: &DocumentField) -> bool {
        if field.value.is_empty() {
            return false;
        }

        let Some(scorer) = &self.scorer else {
            return field.value != NOT_SPECIFIED;
        };

        match scorer.confidence(&field.label, &field.value) {
            Ok(confidence) => {
                debug!("{}: confidence {:.2}", field.label, confidence);
                confidence > self.confidence_threshold
            }
            Err(e) => {
                warn!("Scoring {} failed, using presence check: {}", field.label, e);
                field.value != NOT_SPECIFIED
            }
        }
    }
}

impl Default for TermValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate with the rule-based validator.
pub fn validate_terms(fields: &[DocumentField]) -> Vec<DocumentField> {
    TermValidator::new().validate(fields)
}

/// Percentage of valid fields, rounded half up.
///
/// Scoring an empty field set is an error rather than a silent 0 or 100.
pub fn validation_score(fields: &[DocumentField]) -> Result<u8, ValidationError> {
    let total = fields.len();
    if total == 0 {
        return Err(ValidationError::EmptyFieldSet);
    }

    let valid = fields.iter().filter(|f| f.valid).count();
    let score = (200 * valid + total) / (2 * total);

    Ok(score as u8)
}
