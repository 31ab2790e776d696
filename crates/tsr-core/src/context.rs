//! Session context holding lazily-initialized model capabilities.

use std::sync::Arc;

use tracing::warn;
use tsr_inference::{Capability, ConfidenceScorer, DocumentQuery, Loader, ModelLoadingState};

#[cfg(feature = "native")]
use crate::models::config::ModelConfig;

/// Model capabilities available to the pipeline.
///
/// Each capability is initialized on first use and then reused for the rest
/// of the session. A failed initialization is attempted again next time.
#[derive(Debug)]
pub struct ModelContext {
    query: Capability<Arc<dyn DocumentQuery>>,
    scorer: Capability<Arc<dyn ConfidenceScorer>>,
}

impl ModelContext {
    /// A context without models; extraction always uses the mock table.
    pub fn mock() -> Self {
        Self {
            query: Capability::absent("document-qa"),
            scorer: Capability::absent("term-classifier"),
        }
    }

    /// Register a loader for the document question-answering model.
    pub fn with_query_loader(mut self, loader: Loader<Arc<dyn DocumentQuery>>) -> Self {
        self.query = Capability::new("document-qa", loader);
        self
    }

    /// Register a loader for the confidence scorer.
    pub fn with_scorer_loader(mut self, loader: Loader<Arc<dyn ConfidenceScorer>>) -> Self {
        self.scorer = Capability::new("term-classifier", loader);
        self
    }

    /// Use an already constructed query backend.
    pub fn with_query(mut self, backend: Arc<dyn DocumentQuery>) -> Self {
        self.query = Capability::loaded("document-qa", backend);
        self
    }

    /// Use an already constructed scorer.
    pub fn with_scorer(mut self, scorer: Arc<dyn ConfidenceScorer>) -> Self {
        self.scorer = Capability::loaded("term-classifier", scorer);
        self
    }

    /// Build a context with HTTP backends for the configured endpoints.
    #[cfg(feature = "native")]
    pub fn from_config(config: &ModelConfig) -> Self {
        use std::time::Duration;
        use tsr_inference::{HttpConfidenceScorer, HttpDocumentQuery};

        let mut context = Self::mock();
        let timeout = Duration::from_secs(config.timeout_secs);

        if let Some(endpoint) = config.query_endpoint.clone() {
            let token = config.api_token();
            context = context.with_query_loader(Box::new(move || -> tsr_inference::Result<Arc<dyn DocumentQuery>> {
                let backend = HttpDocumentQuery::new(endpoint.clone(), timeout)?.with_token(token.clone());
                Ok(Arc::new(backend) as Arc<dyn DocumentQuery>)
            }));
        }

        if let Some(endpoint) = config.scorer_endpoint.clone() {
            let token = config.api_token();
            context = context.with_scorer_loader(Box::new(move || -> tsr_inference::Result<Arc<dyn ConfidenceScorer>> {
                let scorer = HttpConfidenceScorer::new(endpoint.clone(), timeout)?.with_token(token.clone());
                Ok(Arc::new(scorer) as Arc<dyn ConfidenceScorer>)
            }));
        }

        context
    }

    /// The query model, initializing it if needed. `None` when unavailable.
    pub fn ensure_query(&mut self) -> Option<Arc<dyn DocumentQuery>> {
        if !self.query.is_configured() {
            return None;
        }
        self.query
            .ensure_loaded()
            .map_err(|e| warn!("Document QA model unavailable: {}", e))
            .ok()
    }

    /// The confidence scorer, initializing it if needed. `None` when unavailable.
    pub fn ensure_scorer(&mut self) -> Option<Arc<dyn ConfidenceScorer>> {
        if !self.scorer.is_configured() {
            return None;
        }
        self.scorer
            .ensure_loaded()
            .map_err(|e| warn!("Term classifier unavailable: {}", e))
            .ok()
    }

    pub fn query_state(&self) -> ModelLoadingState {
        self.query.state()
    }

    pub fn scorer_state(&self) -> ModelLoadingState {
        self.scorer.state()
    }
}

impl Default for ModelContext {
    fn default() -> Self {
        Self::mock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tsr_inference::InferenceError;

    #[test]
    fn test_mock_context_has_no_models() {
        let mut context = ModelContext::mock();
        assert!(context.ensure_query().is_none());
        assert!(context.ensure_scorer().is_none());
        assert_eq!(context.query_state(), ModelLoadingState::Idle);
    }

    #[test]
    fn test_failed_loader_reports_error() {
        let mut context = ModelContext::mock().with_query_loader(Box::new(|| -> tsr_inference::Result<Arc<dyn DocumentQuery>> {
            Err(InferenceError::ModelLoad("no such model".to_string()))
        }));

        assert!(context.ensure_query().is_none());
        assert_eq!(context.query_state(), ModelLoadingState::Error);
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_from_config_registers_configured_endpoints() {
        let config = ModelConfig {
            query_endpoint: Some("http://127.0.0.1:9/qa".to_string()),
            ..ModelConfig::default()
        };
        let mut context = ModelContext::from_config(&config);

        // Building the client does not contact the endpoint.
        assert!(context.ensure_query().is_some());
        assert_eq!(context.query_state(), ModelLoadingState::Loaded);
        assert!(context.ensure_scorer().is_none());
    }
}
