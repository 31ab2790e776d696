//! Model capability traits and backend implementations.

#[cfg(feature = "http")]
pub mod http;

use crate::Result;

/// A single ranked answer returned by a document question-answering model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "http", derive(serde::Deserialize))]
pub struct Answer {
    /// Answer text as produced by the model.
    pub answer: String,

    /// Model score for this answer (0.0 - 1.0), if reported.
    #[cfg_attr(feature = "http", serde(default))]
    pub score: Option<f32>,
}

impl Answer {
    pub fn new(answer: impl Into<String>, score: Option<f32>) -> Self {
        Self {
            answer: answer.into(),
            score,
        }
    }
}

/// Options passed along with every document query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Number of ranked answers to request.
    pub top_k: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self { top_k: 1 }
    }
}

/// Trait for document question-answering backends.
///
/// Given the raw bytes of a document image and a question, a backend returns
/// its answers ranked best first. An empty vector means the model had no
/// answer.
pub trait DocumentQuery: Send + Sync {
    /// Ask `question` about the document in `image`.
    fn query(&self, image: &[u8], question: &str, options: &QueryOptions) -> Result<Vec<Answer>>;

    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;
}

/// Trait for backends that score how trustworthy an extracted value is.
pub trait ConfidenceScorer: Send + Sync {
    /// Confidence (0.0 - 1.0) that `value` is a correct reading of `label`.
    fn confidence(&self, label: &str, value: &str) -> Result<f32>;

    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;
}
