//! ISBN format validation.
//!
//! # Responsibility
//! - Decide whether user or file input is an acceptable catalog key.
//! - Produce the normalized form used for storage and equality.
//!
//! # Invariants
//! - Validation is format-only; no checksum digit is verified.
//! - Surrounding whitespace is ignored before matching.

use once_cell::sync::Lazy;
use regex::Regex;

// `[0-9]` instead of `\d`: the regex crate treats `\d` as any Unicode digit.
static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{10}|97[89]-[0-9]{10})$").expect("valid isbn regex"));

/// Returns whether `value` is an accepted ISBN.
///
/// Accepted shapes:
/// - exactly 10 ASCII digits (`1234567890`);
/// - `978` or `979`, a hyphen, then exactly 10 ASCII digits (`978-1234567890`).
///
/// Blank input is rejected.
pub fn is_valid_isbn(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && ISBN_RE.is_match(trimmed)
}

/// Returns the storage form of an ISBN (trimmed).
pub fn normalize_isbn(value: &str) -> String {
    value.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{is_valid_isbn, normalize_isbn};

    #[test]
    fn accepts_ten_digits_and_prefixed_thirteen() {
        assert!(is_valid_isbn("1234567890"));
        assert!(is_valid_isbn("978-1234567890"));
        assert!(is_valid_isbn("979-0000000001"));
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(!is_valid_isbn("1234567890123"));
        assert!(!is_valid_isbn("978-123"));
        assert!(!is_valid_isbn("977-1234567890"));
        assert!(!is_valid_isbn("978 1234567890"));
        assert!(!is_valid_isbn("123456789X"));
        assert!(!is_valid_isbn(""));
        assert!(!is_valid_isbn("   "));
    }

    #[test]
    fn rejects_non_ascii_digits() {
        // Arabic-Indic digits are `\d` in Unicode regex mode.
        assert!(!is_valid_isbn("١٢٣٤٥٦٧٨٩٠"));
    }

    #[test]
    fn trims_before_validation_and_normalization() {
        assert!(is_valid_isbn("  978-1234567890\n"));
        assert_eq!(normalize_isbn("  978-1234567890\n"), "978-1234567890");
    }
}
