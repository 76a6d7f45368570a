//! # Validation
//!
//! Syntactic checks applied to addresses before anything is sent.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}$")
        .expect("Failed to compile email pattern - this should never happen")
});

/// Whether `address` looks like `local@domain.tld`
///
/// The whole string must match; surrounding whitespace is rejected.
#[must_use]
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_PATTERN.is_match(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_addresses() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(is_valid_email("UPPER_case%x@Example.COM"));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@example.c"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email(" user@example.com"));
        assert!(!is_valid_email("user@example.com "));
        assert!(!is_valid_email("user name@example.com"));
    }
}
