//! Document model as stored by the review dashboard.

use std::fmt;
use std::path::Path;

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::models::field::DocumentField;
use crate::validate::validation_score;

/// Default score at or above which a document counts as validated.
pub const DEFAULT_VALIDATED_THRESHOLD: u8 = 90;

/// A reviewed term sheet document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document identifier.
    pub id: String,

    /// Display name (usually the uploaded file name).
    pub name: String,

    /// Kind of uploaded file.
    #[serde(rename = "type")]
    pub kind: DocumentKind,

    /// Review status.
    pub status: DocumentStatus,

    /// Upload date.
    pub date: NaiveDate,

    /// Percentage of valid fields, `None` until fields are present.
    pub validation_score: Option<u8>,

    /// Extracted fields in extraction order.
    pub content: Vec<DocumentField>,
}

/// Kind of uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "PDF")]
    Pdf,
    Word,
    Excel,
    #[serde(rename = "CSV")]
    Csv,
    Image,
    Email,
    Text,
}

impl DocumentKind {
    /// Guess the kind from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();

        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" | "docx" => Some(Self::Word),
            "xls" | "xlsx" => Some(Self::Excel),
            "csv" => Some(Self::Csv),
            "jpg" | "jpeg" | "png" => Some(Self::Image),
            "eml" | "msg" => Some(Self::Email),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pdf => "PDF",
            Self::Word => "Word",
            Self::Excel => "Excel",
            Self::Csv => "CSV",
            Self::Image => "Image",
            Self::Email => "Email",
            Self::Text => "Text",
        };
        f.write_str(s)
    }
}

/// Review status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[default]
    #[serde(rename = "processing")]
    Processing,
    #[serde(rename = "needs review")]
    NeedsReview,
    #[serde(rename = "validated")]
    Validated,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Processing => "processing",
            Self::NeedsReview => "needs review",
            Self::Validated => "validated",
        };
        f.write_str(s)
    }
}

impl Document {
    /// Create a document that is still being processed.
    pub fn new(name: impl Into<String>, kind: DocumentKind) -> Self {
        Self {
            id: format!("doc-{}", Utc::now().timestamp_millis()),
            name: name.into(),
            kind,
            status: DocumentStatus::Processing,
            date: Local::now().date_naive(),
            validation_score: None,
            content: Vec::new(),
        }
    }

    /// Replace the whole field set and refresh score and status.
    pub fn with_fields(mut self, fields: Vec<DocumentField>) -> Self {
        self.content = fields;
        self.refresh(DEFAULT_VALIDATED_THRESHOLD);
        self
    }

    /// Recompute the validation score and derive the status from it.
    ///
    /// A document is `validated` once its score reaches `validated_threshold`.
    /// An empty field set has no score and needs review.
    pub fn refresh(&mut self, validated_threshold: u8) {
        self.validation_score = validation_score(&self.content).ok();
        self.status = match self.validation_score {
            Some(score) if score >= validated_threshold => DocumentStatus::Validated,
            _ => DocumentStatus::NeedsReview,
        };
    }

    /// Set a field's value, looked up by id or (case-insensitive) label.
    ///
    /// The field's validity is left untouched; re-validate afterwards.
    pub fn edit_field(&mut self, key: &str, value: impl Into<String>) -> Result<(), DocumentError> {
        let field = self
            .content
            .iter_mut()
            .find(|f| f.id == key || f.label.eq_ignore_ascii_case(key))
            .ok_or_else(|| DocumentError::UnknownField(key.to_string()))?;

        field.value = value.into();
        Ok(())
    }

    /// Fields currently marked invalid.
    pub fn invalid_fields(&self) -> impl Iterator<Item = &DocumentField> {
        self.content.iter().filter(|f| !f.valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_fields() -> Vec<DocumentField> {
        vec![
            DocumentField::new("field-1", "Company Name", "Acme Corporation", true),
            DocumentField::new("field-2", "Investment Amount", "$5,000,000", true),
            DocumentField::new("field-3", "Anti-Dilution", "", false),
            DocumentField::new("field-4", "Closing Date", "2023-09-30", true),
        ]
    }

    #[test]
    fn test_refresh_score_and_status() {
        let doc = Document::new("Series A Term Sheet", DocumentKind::Pdf).with_fields(sample_fields());
        assert_eq!(doc.validation_score, Some(75));
        assert_eq!(doc.status, DocumentStatus::NeedsReview);

        let mut doc = doc;
        doc.refresh(75);
        assert_eq!(doc.status, DocumentStatus::Validated);
    }

    #[test]
    fn test_empty_document_has_no_score() {
        let doc = Document::new("empty.pdf", DocumentKind::Pdf).with_fields(Vec::new());
        assert_eq!(doc.validation_score, None);
        assert_eq!(doc.status, DocumentStatus::NeedsReview);
    }

    #[test]
    fn test_edit_field_by_id_and_label() {
        let mut doc = Document::new("sheet.pdf", DocumentKind::Pdf).with_fields(sample_fields());

        doc.edit_field("field-3", "Broad-based").unwrap();
        doc.edit_field("closing date", "9/30/2023").unwrap();

        assert_eq!(doc.content[2].value, "Broad-based");
        assert_eq!(doc.content[3].value, "9/30/2023");
        assert_eq!(
            doc.edit_field("field-99", "x"),
            Err(DocumentError::UnknownField("field-99".to_string()))
        );
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut doc = Document::new("Series A Term Sheet", DocumentKind::Pdf).with_fields(sample_fields());
        doc.id = "doc-001".to_string();
        doc.date = NaiveDate::from_ymd_opt(2023, 8, 15).unwrap();

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["id"], "doc-001");
        assert_eq!(json["type"], "PDF");
        assert_eq!(json["status"], "needs review");
        assert_eq!(json["date"], "2023-08-15");
        assert_eq!(json["validationScore"], 75);
        assert_eq!(json["content"][1]["label"], "Investment Amount");

        let back: Document = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_kind_from_path() {
        assert_eq!(DocumentKind::from_path(Path::new("a.DOCX")), Some(DocumentKind::Word));
        assert_eq!(DocumentKind::from_path(Path::new("scan.jpeg")), Some(DocumentKind::Image));
        assert_eq!(DocumentKind::from_path(Path::new("archive.zip")), None);
    }
}
