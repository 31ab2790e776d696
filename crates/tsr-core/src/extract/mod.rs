//! Term sheet field extraction.

mod strategy;

pub use strategy::ExtractionStrategy;

use tracing::{debug, info, warn};
use tsr_inference::QueryOptions;

use crate::media::DocumentImage;
use crate::models::config::ExtractionConfig;
use crate::models::field::DocumentField;

/// Extracts one value per requested field from a document.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    strategy: ExtractionStrategy,
    question_template: String,
    options: QueryOptions,
}

impl FieldExtractor {
    /// Create an extractor using `strategy` and the default question template.
    pub fn new(strategy: ExtractionStrategy) -> Self {
        let defaults = ExtractionConfig::default();
        Self {
            strategy,
            question_template: defaults.question_template,
            options: QueryOptions { top_k: defaults.top_k },
        }
    }

    /// Apply question template and query options from configuration.
    pub fn with_config(mut self, config: &ExtractionConfig) -> Self {
        self.question_template = config.question_template.clone();
        self.options = QueryOptions {
            top_k: config.top_k.max(1),
        };
        self
    }

    pub fn strategy(&self) -> &ExtractionStrategy {
        &self.strategy
    }

    /// Extract every field in `field_names`, in order.
    ///
    /// Each name yields exactly one field with id `field-{n}`, repeated names
    /// included. A failed query leaves that field empty and invalid; the rest
    /// of the batch still runs. Queries are issued one at a time.
    pub fn extract<S: AsRef<str>>(&self, image: &DocumentImage, field_names: &[S]) -> Vec<DocumentField> {
        debug!(
            "Extracting {} fields with {} strategy",
            field_names.len(),
            self.strategy.name()
        );

        let fields: Vec<DocumentField> = field_names
            .iter()
            .enumerate()
            .map(|(index, name)| self.extract_one(index, name.as_ref(), image))
            .collect();

        info!(
            "Document text extraction completed: {}/{} fields with values",
            fields.iter().filter(|f| !f.value.is_empty()).count(),
            fields.len()
        );

        fields
    }

    fn extract_one(&self, index: usize, label: &str, image: &DocumentImage) -> DocumentField {
        let id = DocumentField::id_for_index(index);
        let question = self.question_template.replace("{label}", label);

        match self
            .strategy
            .extract_field(label, image.bytes(), &question, &self.options)
        {
            Ok((value, confidence)) => {
                if let Some(confidence) = confidence {
                    debug!("{} = {:?} (score {:.2})", label, value, confidence);
                }
                // Mock values are always accepted here; validation decides later.
                let valid = match self.strategy {
                    ExtractionStrategy::Mock => true,
                    ExtractionStrategy::Model(_) => !value.is_empty(),
                };
                DocumentField::new(id, label, value, valid)
            }
            Err(e) => {
                warn!("Extraction failed for {}: {}", label, e);
                DocumentField::new(id, label, "", false)
            }
        }
    }
}
