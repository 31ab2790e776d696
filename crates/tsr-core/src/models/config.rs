//! Configuration structures for the review pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::document::DEFAULT_VALIDATED_THRESHOLD;

/// Main configuration for tsr.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TsrConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Validation policy.
    pub validation: ValidationConfig,

    /// Model endpoint configuration.
    pub models: ModelConfig,

    /// Snapshot storage configuration.
    pub storage: StorageConfig,
}

/// How field values are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    /// Use the model when it loads, otherwise the mock table.
    #[default]
    Auto,
    /// Always use the mock table.
    Mock,
    /// Prefer the model; failures still fall back to the mock table.
    Model,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Strategy selection.
    pub strategy: StrategyMode,

    /// Question asked per field; `{label}` is replaced with the field label.
    pub question_template: String,

    /// Number of ranked answers requested per question.
    pub top_k: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyMode::Auto,
            question_template: "What is the {label}?".to_string(),
            top_k: 1,
        }
    }
}

/// Validation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Free-text values are valid when the scorer's confidence exceeds this (0.0 - 1.0).
    pub confidence_threshold: f32,

    /// Score at or above which a document is marked validated.
    pub validated_threshold: u8,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.8,
            validated_threshold: DEFAULT_VALIDATED_THRESHOLD,
        }
    }
}

/// Hosted model endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Document question-answering endpoint URL.
    pub query_endpoint: Option<String>,

    /// Confidence scoring (text classification) endpoint URL.
    pub scorer_endpoint: Option<String>,

    /// Environment variable holding the API token.
    pub api_token_env: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            query_endpoint: None,
            scorer_endpoint: None,
            api_token_env: "TSR_API_TOKEN".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ModelConfig {
    /// Read the API token from the configured environment variable.
    pub fn api_token(&self) -> Option<String> {
        std::env::var(&self.api_token_env).ok().filter(|t| !t.is_empty())
    }
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding persisted snapshots.
    pub snapshot_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from(".tsr"),
        }
    }
}

impl TsrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
