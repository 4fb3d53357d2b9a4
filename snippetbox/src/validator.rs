//! Form validation
//!
//! Stateless predicates plus [`Validator`], the error accumulator every form
//! carries. Handlers run `check_field` for each rule, then re-render the form
//! with status 422 when `valid()` is false, so templates can show each field's
//! error next to the input the user typed.
//!
//! ```rust,ignore
//! let mut v = Validator::default();
//! v.check_field(not_blank(&form.title), "title", "This field cannot be blank");
//! v.check_field(max_chars(&form.title, 100), "title", "This field cannot be more than 100 characters long");
//! if !v.valid() { /* re-render */ }
//! ```

use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Loose e-mail shape check (local part, `@`, dot-separated DNS labels)
pub static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("EMAIL_RX is a valid pattern")
});

/// Accumulated validation errors for one form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validator {
    /// Errors not tied to one input, in insertion order
    pub non_field_errors: Vec<String>,
    /// At most one message per field
    pub field_errors: HashMap<String, String>,
}

impl Validator {
    /// True when no error of either kind was recorded
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    /// Record `message` for `key` unless the field already has an error
    pub fn add_field_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.field_errors
            .entry(key.into())
            .or_insert_with(|| message.into());
    }

    pub fn add_non_field_error(&mut self, message: impl Into<String>) {
        self.non_field_errors.push(message.into());
    }

    /// Record a field error when `ok` is false
    pub fn check_field(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_field_error(key, message);
        }
    }

    /// Error recorded for `key`, if any
    pub fn field_error(&self, key: &str) -> Option<&str> {
        self.field_errors.get(key).map(String::as_str)
    }
}

/// True when the value has a non-whitespace character
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Character count, not byte count
pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

pub fn matches(value: &str, rx: &Regex) -> bool {
    rx.is_match(value)
}

pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_field_first_error_wins() {
        let mut v = Validator::default();
        v.check_field(false, "title", "This field cannot be blank");
        v.check_field(false, "title", "This field cannot be more than 100 characters long");

        assert!(!v.valid());
        assert_eq!(v.field_error("title"), Some("This field cannot be blank"));
        assert_eq!(v.field_errors.len(), 1);
    }

    #[test]
    fn test_passing_checks_leave_validator_valid() {
        let mut v = Validator::default();
        v.check_field(true, "title", "unused");
        v.check_field(not_blank("x"), "content", "unused");
        assert!(v.valid());
        assert_eq!(v.field_error("title"), None);
    }

    #[test]
    fn test_non_field_errors_accumulate() {
        let mut v = Validator::default();
        v.add_non_field_error("Email or password is incorrect");
        v.add_non_field_error("Try again later");

        assert!(!v.valid());
        assert!(v.field_errors.is_empty());
        assert_eq!(
            v.non_field_errors,
            vec!["Email or password is incorrect", "Try again later"]
        );
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("a"));
        assert!(!not_blank(""));
        assert!(!not_blank(" \t\n "));
    }

    #[test]
    fn test_char_counts_are_unicode_aware() {
        // five characters, fifteen bytes
        let value = "こんにちは";
        assert!(max_chars(value, 5));
        assert!(!max_chars(value, 4));
        assert!(min_chars(value, 5));
        assert!(!min_chars(value, 6));
    }

    #[test]
    fn test_permitted_value() {
        assert!(permitted_value(&7, &[1, 7, 365]));
        assert!(!permitted_value(&30, &[1, 7, 365]));
        assert!(permitted_value(&"b", &["a", "b"]));
    }

    #[test]
    fn test_email_rx() {
        let cases = [
            ("alice@example.com", true),
            ("bob.smith+tag@mail.example.co.uk", true),
            ("no-at-sign.example.com", false),
            ("trailing@dot.", false),
            ("@example.com", false),
            ("spaces in@example.com", false),
        ];

        for (email, want) in cases {
            assert_eq!(matches(email, &EMAIL_RX), want, "{email}");
        }
    }

    #[test]
    fn test_validator_serializes_for_templates() {
        let mut v = Validator::default();
        v.add_field_error("email", "This field must be a valid email address");
        let value = serde_json::to_value(&v).unwrap();
        assert_eq!(
            value["field_errors"]["email"],
            "This field must be a valid email address"
        );
        assert_eq!(value["non_field_errors"], serde_json::json!([]));
    }
}
