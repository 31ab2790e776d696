//! Date rule.

use super::patterns::{DATE_ISO, DATE_US};

/// Whether `value` is a date in `YYYY-MM-DD` or `M/D/YYYY` form.
///
/// The whole value must match; surrounding text is rejected. Only the shape
/// is checked, not calendar validity.
pub fn is_valid_date(value: &str) -> bool {
    DATE_ISO.is_match(value) || DATE_US.is_match(value)
}
