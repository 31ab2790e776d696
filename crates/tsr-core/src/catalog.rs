//! The fixed catalog of term sheet fields.

/// Value reported when a field has no known value.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Fields extracted from every term sheet, in display order.
pub const TERM_SHEET_FIELDS: [&str; 12] = [
    "Company Name",
    "Investment Amount",
    "Pre-Money Valuation",
    "Post-Money Valuation",
    "Investor Name",
    "Board Seats",
    "Liquidation Preference",
    "Participation",
    "Anti-Dilution",
    "Vesting Schedule",
    "Option Pool",
    "Closing Date",
];

/// Canonical mock value for a field label (case-insensitive).
///
/// Unknown labels map to [`NOT_SPECIFIED`].
pub fn mock_value(label: &str) -> &'static str {
    match label.to_lowercase().as_str() {
        "company name" => "TechVenture Inc.",
        "investment amount" => "$2,500,000",
        "pre-money valuation" => "$10,000,000",
        "post-money valuation" => "$12,500,000",
        "investor name" => "Horizon Capital Partners",
        "board seats" => "1",
        "liquidation preference" => "1x",
        "participation" => "Non-participating",
        "anti-dilution" => "Broad-based weighted average",
        "vesting schedule" => "4 years with 1 year cliff",
        "option pool" => "10%",
        "closing date" => "2023-06-30",
        _ => NOT_SPECIFIED,
    }
}
