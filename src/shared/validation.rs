use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating SQL identifiers used as table and column names
    /// - Valid: "news_items", "is_published", "_tmp"
    /// - Invalid: "News", "drop table", "col;--", "1col"
    pub static ref IDENTIFIER_REGEX: Regex = Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap();

    /// Regex for validating phone numbers
    /// Optional leading plus, then 7-15 digits separated by single spaces or hyphens
    /// - Valid: "+91 98765 43210", "022-2345678", "9876543210"
    /// - Invalid: "12345", "phone", "+91--98765", "98765 "
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]+(?:[ -][0-9]+)*$").unwrap();
}

/// Check a phone number against [`PHONE_REGEX`] and the 7-15 digit range
pub fn is_valid_phone(value: &str) -> bool {
    if !PHONE_REGEX.is_match(value) {
        return false;
    }
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    (7..=15).contains(&digits)
}
