//! A single extracted term sheet field.

use serde::{Deserialize, Serialize};

/// One named data point extracted from a term sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentField {
    /// Stable identifier, `field-{n}` in extraction order.
    pub id: String,

    /// Human-readable field name, e.g. "Investment Amount".
    pub label: String,

    /// Extracted (or edited) value, possibly empty.
    pub value: String,

    /// Set by the validator.
    pub valid: bool,
}

impl DocumentField {
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: impl Into<String>, valid: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
            valid,
        }
    }

    /// Identifier for the field at a 0-based extraction position.
    pub fn id_for_index(index: usize) -> String {
        format!("field-{}", index + 1)
    }
}
