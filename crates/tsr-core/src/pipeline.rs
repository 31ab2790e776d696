//! The extract → validate pipeline.

use tracing::{debug, error, info, warn};

use crate::catalog::TERM_SHEET_FIELDS;
use crate::context::ModelContext;
use crate::error::PipelineError;
use crate::extract::{ExtractionStrategy, FieldExtractor};
use crate::media::DocumentImage;
use crate::models::config::{ExtractionConfig, StrategyMode, TsrConfig, ValidationConfig};
use crate::models::field::DocumentField;
use crate::validate::TermValidator;

/// Processes term sheet documents within one session.
///
/// The pipeline owns the [`ModelContext`], so models loaded for one document
/// are reused for the next.
#[derive(Debug)]
pub struct TermSheetPipeline {
    context: ModelContext,
    extraction: ExtractionConfig,
    validation: ValidationConfig,
}

impl TermSheetPipeline {
    /// Create a pipeline over `context` with settings from `config`.
    pub fn new(context: ModelContext, config: &TsrConfig) -> Self {
        Self {
            context,
            extraction: config.extraction.clone(),
            validation: config.validation.clone(),
        }
    }

    /// A pipeline that only uses the mock table.
    pub fn mock() -> Self {
        Self::new(ModelContext::mock(), &TsrConfig::default())
    }

    pub fn context(&self) -> &ModelContext {
        &self.context
    }

    /// Pick the extraction strategy, loading the query model if needed.
    ///
    /// An unavailable model is not an error: extraction falls back to the
    /// mock table.
    pub fn resolve_strategy(&mut self) -> ExtractionStrategy {
        if self.extraction.strategy == StrategyMode::Mock {
            return ExtractionStrategy::Mock;
        }

        match self.context.ensure_query() {
            Some(backend) => {
                debug!("Using document QA model: {}", backend.name());
                ExtractionStrategy::Model(backend)
            }
            None => {
                if self.extraction.strategy == StrategyMode::Model {
                    warn!("Model strategy requested but no model is available, using mock values");
                } else {
                    debug!("No document QA model available, using mock values");
                }
                ExtractionStrategy::Mock
            }
        }
    }

    /// Build the validator, attaching the confidence scorer outside mock mode.
    pub fn validator(&mut self) -> TermValidator {
        let scorer = match self.extraction.strategy {
            StrategyMode::Mock => None,
            StrategyMode::Auto | StrategyMode::Model => self.context.ensure_scorer(),
        };

        TermValidator::new()
            .with_scorer(scorer)
            .with_confidence_threshold(self.validation.confidence_threshold)
    }

    /// Extract and validate the catalog fields of a document.
    ///
    /// `Err` means processing failed; `Ok` carries the validated fields.
    pub fn process(&mut self, image: &DocumentImage) -> Result<Vec<DocumentField>, PipelineError> {
        info!("Processing document: {} ({} bytes)", image.media_type(), image.bytes().len());

        if let Err(e) = image.verify() {
            error!("Error in document processing: {}", e);
            return Err(e.into());
        }

        let extractor = FieldExtractor::new(self.resolve_strategy()).with_config(&self.extraction);
        let fields = extractor.extract(image, &TERM_SHEET_FIELDS);

        Ok(self.validator().validate(&fields))
    }

    /// Process a document given as a `data:` URL.
    pub fn process_data_url(&mut self, url: &str) -> Result<Vec<DocumentField>, PipelineError> {
        let image = DocumentImage::from_data_url(url).map_err(|e| {
            error!("Error in document processing: {}", e);
            PipelineError::from(e)
        })?;

        self.process(&image)
    }

    /// Re-validate fields, e.g. after the user edited values.
    pub fn validate_terms(&mut self, fields: &[DocumentField]) -> Vec<DocumentField> {
        self.validator().validate(fields)
    }
}
