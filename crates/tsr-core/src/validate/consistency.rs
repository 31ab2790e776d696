//! Cross-field consistency checks.
//!
//! These produce review warnings only; they never change a field's validity.

use rust_decimal::Decimal;

use super::amounts::parse_amount;
use crate::models::field::DocumentField;

fn find_amount(fields: &[DocumentField], needles: &[&str]) -> Option<Decimal> {
    fields
        .iter()
        .find(|f| {
            let label = f.label.to_lowercase();
            needles.iter().all(|n| label.contains(n))
        })
        .and_then(|f| parse_amount(&f.value))
}

/// Check that pre-money valuation plus investment equals post-money valuation.
pub fn check_consistency(fields: &[DocumentField]) -> Vec<String> {
    let mut warnings = Vec::new();

    let pre = find_amount(fields, &["pre-money", "valuation"]);
    let post = find_amount(fields, &["post-money", "valuation"]);
    let investment = find_amount(fields, &["investment", "amount"]);

    if let (Some(pre), Some(post), Some(investment)) = (pre, post, investment) {
        // An overflowing sum is larger than any post-money value.
        if pre.checked_add(investment) != Some(post) {
            warnings.push(format!(
                "Pre-money valuation ({}) plus investment ({}) differs from post-money valuation ({})",
                pre, investment, post
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pre: &str, investment: &str, post: &str) -> Vec<DocumentField> {
        vec![
            DocumentField::new("field-1", "Investment Amount", investment, true),
            DocumentField::new("field-2", "Pre-Money Valuation", pre, true),
            DocumentField::new("field-3", "Post-Money Valuation", post, true),
        ]
    }

    #[test]
    fn test_consistent_valuation() {
        assert!(check_consistency(&fields("$10,000,000", "$2,500,000", "$12,500,000")).is_empty());
    }

    #[test]
    fn test_inconsistent_valuation() {
        let warnings = check_consistency(&fields("$20,000,000", "$5,000,000", "$24,000,000"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("24000000"));
    }

    #[test]
    fn test_overflowing_sum_is_inconsistent() {
        let huge = "70000000000000000000000000000";
        let fields = fields(huge, huge, "1");
        assert!(crate::validate::validate_terms(&fields).iter().all(|f| f.valid));

        let warnings = check_consistency(&fields);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains(huge));
    }

    #[test]
    fn test_unparseable_values_are_skipped() {
        assert!(check_consistency(&fields("twenty million", "$5,000,000", "$24,000,000")).is_empty());
    }
}
