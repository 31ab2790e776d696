//! Monetary amount rule and parsing.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::MONETARY_AMOUNT;

/// Whether `value` is a monetary amount such as `$5,000,000` or `1000.50`.
pub fn is_valid_amount(value: &str) -> bool {
    MONETARY_AMOUNT.is_match(value)
}

/// Parse a well-formed amount into a decimal, dropping `$` and separators.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    if !is_valid_amount(value) {
        return None;
    }

    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    Decimal::from_str(&cleaned).ok()
}
