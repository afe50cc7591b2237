//! Field-level business rules for the request bodies.
//!
//! Every validator is a pure function that stops at the first violated
//! rule and reports it as a single message. Rule order is part of the
//! contract: callers and tests rely on which message wins.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

mod account;
mod event;
mod review;
mod ticket;

pub use account::{validate_login, validate_sign_up};
pub use event::{validate_event, validate_event_at};
pub use review::validate_review;
pub use ticket::validate_ticket;

pub type ValidationResult = Result<(), ValidationError>;

/// The first rule an input broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

/// Whether a write creates a record or edits an existing one. Edits must
/// name the record they touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Edit,
}

impl WriteMode {
    pub fn is_edit(self) -> bool {
        matches!(self, WriteMode::Edit)
    }
}

pub(crate) static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("valid regex")
});

pub(crate) static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z ]+$").expect("valid regex"));

pub(crate) static PHONE_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+\d{1,2}\s)?\(?\d{3}\)?[\s.-]\d{3}[\s.-]\d{4}$").expect("valid regex")
});

pub(crate) static PRICE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]{1,2})?$").expect("valid regex"));

pub(crate) static RATING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9](\.[0-9]{1,2})?$").expect("valid regex"));

pub(crate) fn require(value: &str, message: &str) -> ValidationResult {
    ensure(!value.is_empty(), message)
}

pub(crate) fn ensure(condition: bool, message: &str) -> ValidationResult {
    if condition {
        Ok(())
    } else {
        Err(ValidationError::new(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(EMAIL_REGEX.is_match("jane.doe@example.com"));
        assert!(EMAIL_REGEX.is_match("a-b@mail.co.uk"));
        assert!(!EMAIL_REGEX.is_match("jane.doe@example"));
        assert!(!EMAIL_REGEX.is_match("@example.com"));
        assert!(!EMAIL_REGEX.is_match("jane doe@example.com"));
    }

    #[test]
    fn test_phone_pattern() {
        assert!(PHONE_NUMBER_REGEX.is_match("123-456-7890"));
        assert!(PHONE_NUMBER_REGEX.is_match("(123) 456-7890"));
        assert!(PHONE_NUMBER_REGEX.is_match("+40 723.456.7890"));
        assert!(!PHONE_NUMBER_REGEX.is_match("1234567890"));
        assert!(!PHONE_NUMBER_REGEX.is_match("phone"));
    }

    #[test]
    fn test_name_pattern_rejects_digits_anywhere() {
        assert!(NAME_REGEX.is_match("Mary Ann"));
        assert!(!NAME_REGEX.is_match("Bob1"));
        assert!(!NAME_REGEX.is_match("1Bob"));
    }

    #[test]
    fn test_price_pattern() {
        assert!(PRICE_REGEX.is_match("0"));
        assert!(PRICE_REGEX.is_match("120"));
        assert!(PRICE_REGEX.is_match("19.99"));
        assert!(!PRICE_REGEX.is_match("19.999"));
        assert!(!PRICE_REGEX.is_match("-5"));
        assert!(!PRICE_REGEX.is_match("12."));
    }

    #[test]
    fn test_rating_pattern() {
        assert!(RATING_REGEX.is_match("1"));
        assert!(RATING_REGEX.is_match("4.20"));
        assert!(!RATING_REGEX.is_match("10"));
        assert!(!RATING_REGEX.is_match("4.205"));
    }

    #[test]
    fn test_require_and_ensure() {
        assert!(require("x", "missing").is_ok());
        assert_eq!(
            require("", "missing").unwrap_err().message(),
            "missing"
        );
        assert!(ensure(true, "never").is_ok());
        assert_eq!(ensure(false, "broken").unwrap_err().to_string(), "broken");
    }
}
