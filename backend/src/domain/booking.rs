//! Booking records and attendee email validation.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::EventId;

/// Validation errors raised for booking input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingValidationError {
    /// No email was supplied.
    #[error("Email is required")]
    EmptyEmail,
    /// The email does not look like `local@domain.tld`.
    #[error("Invalid email format")]
    InvalidEmail,
}

/// Stable booking identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Attendee email address, trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalize an email address.
    ///
    /// # Examples
    /// ```
    /// use devevent::domain::Email;
    ///
    /// let email = Email::new("  Ada@Example.COM ").expect("valid email");
    /// assert_eq!(email.as_ref(), "ada@example.com");
    /// assert!(Email::new("ada@example").is_err());
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, BookingValidationError> {
        let normalized = value.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(BookingValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalized) {
            return Err(BookingValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = BookingValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A visitor's reservation for an event.
///
/// The referenced event existed when the booking was written; later removal
/// of the event does not invalidate the booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub event_id: EventId,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com", "ada@example.com")]
    #[case("  Grace.Hopper@Navy.MIL  ", "grace.hopper@navy.mil")]
    #[case("a+tag@sub.example.org", "a+tag@sub.example.org")]
    fn email_is_normalized(#[case] input: &str, #[case] expected: &str) {
        let email = Email::new(input).expect("valid email");
        assert_eq!(email.as_ref(), expected);
    }

    #[rstest]
    #[case("", BookingValidationError::EmptyEmail)]
    #[case("   ", BookingValidationError::EmptyEmail)]
    #[case("ada", BookingValidationError::InvalidEmail)]
    #[case("ada@example", BookingValidationError::InvalidEmail)]
    #[case("ada lovelace@example.com", BookingValidationError::InvalidEmail)]
    #[case("@example.com", BookingValidationError::InvalidEmail)]
    fn email_rejects_malformed_input(#[case] input: &str, #[case] expected: BookingValidationError) {
        assert_eq!(Email::new(input), Err(expected));
    }
}
