//! Extraction strategies.

use std::fmt;
use std::sync::Arc;

use tsr_inference::{DocumentQuery, QueryOptions};

use crate::catalog::mock_value;

/// How a field value is produced.
#[derive(Clone)]
pub enum ExtractionStrategy {
    /// Deterministic lookup in the mock value table.
    Mock,
    /// One question per field to a document question-answering model.
    Model(Arc<dyn DocumentQuery>),
}

impl ExtractionStrategy {
    pub fn name(&self) -> &str {
        match self {
            Self::Mock => "mock",
            Self::Model(backend) => backend.name(),
        }
    }

    /// Produce a value for `label`, with the model's confidence when known.
    pub(crate) fn extract_field(
        &self,
        label: &str,
        image: &[u8],
        question: &str,
        options: &QueryOptions,
    ) -> tsr_inference::Result<(String, Option<f32>)> {
        match self {
            Self::Mock => Ok((mock_value(label).to_string(), None)),
            Self::Model(backend) => {
                let answers = backend.query(image, question, options)?;
                Ok(answers
                    .into_iter()
                    .next()
                    .map(|top| (top.answer.trim().to_string(), top.score))
                    .unwrap_or_default())
            }
        }
    }
}

impl fmt::Debug for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mock => f.write_str("Mock"),
            Self::Model(backend) => f.debug_tuple("Model").field(&backend.name()).finish(),
        }
    }
}
