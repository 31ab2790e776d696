//! Regex patterns for term validation.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ISO date: 2023-09-30
    pub static ref DATE_ISO: Regex = Regex::new(
        r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$"
    ).unwrap();

    // US date: 9/30/2023 or 09/30/2023
    pub static ref DATE_US: Regex = Regex::new(
        r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}$"
    ).unwrap();

    // Monetary amount: $5,000,000 or 1000.50
    pub static ref MONETARY_AMOUNT: Regex = Regex::new(
        r"^\$?[0-9,]+(\.[0-9]{1,2})?$"
    ).unwrap();
}
