//! Backends calling hosted inference endpoints over HTTP.
//!
//! Request and response shapes follow the common hosted-inference JSON
//! conventions: document question answering takes a base64 image and a
//! question and returns ranked `{answer, score}` objects; text classification
//! takes a string and returns `{label, score}` objects.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::InferenceError;
use crate::{Answer, ConfidenceScorer, DocumentQuery, QueryOptions, Result};

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| InferenceError::ModelLoad(e.to_string()))
}

fn post_json<T: for<'de> Deserialize<'de>>(
    client: &Client,
    endpoint: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Result<T> {
    let mut request = client.post(endpoint).json(body);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .map_err(|e| InferenceError::QueryFailed(e.to_string()))?
        .error_for_status()
        .map_err(|e| InferenceError::QueryFailed(e.to_string()))?;

    response
        .json::<T>()
        .map_err(|e| InferenceError::InvalidResponse(e.to_string()))
}

/// Document question answering through a hosted endpoint.
pub struct HttpDocumentQuery {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpDocumentQuery {
    /// Create a backend for `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
            token: None,
        })
    }

    /// Set the bearer token sent with every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

impl DocumentQuery for HttpDocumentQuery {
    fn query(&self, image: &[u8], question: &str, options: &QueryOptions) -> Result<Vec<Answer>> {
        debug!("Querying {} ({} image bytes): {}", self.endpoint, image.len(), question);

        let body = json!({
            "inputs": {
                "image": STANDARD.encode(image),
                "question": question,
            },
            "parameters": { "top_k": options.top_k },
        });

        let mut answers: Vec<Answer> =
            post_json(&self.client, &self.endpoint, self.token.as_deref(), &body)?;

        // Endpoints usually rank already; don't rely on it.
        answers.sort_by(|a, b| {
            b.score
                .unwrap_or(0.0)
                .partial_cmp(&a.score.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(answers)
    }

    fn name(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    #[allow(dead_code)]
    label: String,
    score: f32,
}

/// Classification endpoints answer with either a flat or a nested list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassificationResponse {
    fn top_score(self) -> Option<f32> {
        let scores = match self {
            Self::Nested(outer) => outer.into_iter().flatten().collect::<Vec<_>>(),
            Self::Flat(scores) => scores,
        };
        scores.into_iter().map(|s| s.score).reduce(f32::max)
    }
}

/// Confidence scoring through a hosted text-classification endpoint.
pub struct HttpConfidenceScorer {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpConfidenceScorer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

impl ConfidenceScorer for HttpConfidenceScorer {
    fn confidence(&self, label: &str, value: &str) -> Result<f32> {
        let body = json!({ "inputs": format!("{}: {}", label, value) });

        let response: ClassificationResponse =
            post_json(&self.client, &self.endpoint, self.token.as_deref(), &body)?;

        response
            .top_score()
            .ok_or_else(|| InferenceError::InvalidResponse("no scores returned".to_string()))
    }

    fn name(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_answers() {
        let json = r#"[{"answer": "TechVenture Inc.", "score": 0.93, "start": 4, "end": 5}]"#;
        let answers: Vec<Answer> = serde_json::from_str(json).unwrap();
        assert_eq!(answers, vec![Answer::new("TechVenture Inc.", Some(0.93))]);
    }

    #[test]
    fn test_parse_answer_without_score() {
        let answers: Vec<Answer> = serde_json::from_str(r#"[{"answer": "1x"}]"#).unwrap();
        assert_eq!(answers[0].score, None);
    }

    #[test]
    fn test_classification_top_score() {
        let nested: ClassificationResponse = serde_json::from_str(
            r#"[[{"label": "POSITIVE", "score": 0.91}, {"label": "NEGATIVE", "score": 0.09}]]"#,
        )
        .unwrap();
        assert_eq!(nested.top_score(), Some(0.91));

        let flat: ClassificationResponse =
            serde_json::from_str(r#"[{"label": "NEGATIVE", "score": 0.4}]"#).unwrap();
        assert_eq!(flat.top_score(), Some(0.4));

        let empty: ClassificationResponse = serde_json::from_str("[]").unwrap();
        assert_eq!(empty.top_score(), None);
    }
}
