//! Event slugs: derivation from titles and validation of lookup input.
//!
//! Slugs are trimmed, non-empty identifiers composed of lowercase ASCII
//! letters, digits, and hyphens. Derived slugs never start or end with a
//! hyphen; disambiguated slugs append `-{n}` to the derived base.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validation errors raised when accepting a slug from outside the domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugValidationError {
    /// No slug was supplied.
    #[error("slug must not be empty")]
    Empty,
    /// The slug contains characters outside `[a-z0-9-]`.
    #[error("slug contains invalid characters")]
    InvalidCharacters,
}

/// URL-safe event identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate a stored or derived slug.
    pub fn new(value: impl Into<String>) -> Result<Self, SlugValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SlugValidationError::Empty);
        }
        if !is_valid_slug(&value) {
            return Err(SlugValidationError::InvalidCharacters);
        }
        Ok(Self(value))
    }

    /// Accept a slug from a request path.
    ///
    /// Input is trimmed and lowercased before validation, so `My-Talk`
    /// resolves to `my-talk`.
    ///
    /// # Examples
    /// ```
    /// use devevent::domain::Slug;
    ///
    /// let slug = Slug::from_lookup(" RustConf-2026 ").expect("valid slug");
    /// assert_eq!(slug.as_ref(), "rustconf-2026");
    /// assert!(Slug::from_lookup("rust_conf").is_err());
    /// ```
    pub fn from_lookup(input: &str) -> Result<Self, SlugValidationError> {
        Self::new(input.trim().to_lowercase())
    }

    /// Derive the base slug for `title`.
    ///
    /// Falls back to the millisecond timestamp of `now` when the title has no
    /// ASCII letters or digits.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use devevent::domain::Slug;
    ///
    /// let slug = Slug::derive("My Talk!!", Utc::now());
    /// assert_eq!(slug.as_ref(), "my-talk");
    /// ```
    pub fn derive(title: &str, now: DateTime<Utc>) -> Self {
        let normalized = normalize_title(title);
        if normalized.is_empty() {
            Self(now.timestamp_millis().unsigned_abs().to_string())
        } else {
            Self(normalized)
        }
    }

    /// Disambiguated form `{base}-{suffix}`; suffix `0` returns the base.
    #[must_use]
    pub fn with_suffix(&self, suffix: u32) -> Self {
        if suffix == 0 {
            self.clone()
        } else {
            Self(format!("{}-{suffix}", self.0))
        }
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalize a title into slug form without uniqueness or fallback handling.
///
/// Lowercases and trims the title, drops characters other than ASCII letters,
/// digits, whitespace, hyphens, and underscores, then turns every run of
/// separators into a single hyphen. Separators at either end are dropped.
///
/// # Examples
/// ```
/// use devevent::domain::normalize_title;
///
/// assert_eq!(normalize_title("My Talk!!"), "my-talk");
/// assert_eq!(normalize_title("Rust -- in   Prod"), "rust-in-prod");
/// assert_eq!(normalize_title("!!!"), "");
/// ```
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;
    for ch in lowered.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_separator = false;
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_separator = true;
        }
    }
    slug
}

/// Return `true` when `value` is a valid slug.
pub(crate) fn is_valid_slug(value: &str) -> bool {
    is_trimmed_non_empty(value) && has_allowed_slug_chars(value)
}

fn is_trimmed_non_empty(value: &str) -> bool {
    !value.is_empty() && value.trim() == value
}

fn has_allowed_slug_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_123)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case("My Talk!!", "my-talk")]
    #[case("  RustConf 2026  ", "rustconf-2026")]
    #[case("KubeCon + CloudNativeCon Europe", "kubecon-cloudnativecon-europe")]
    #[case("AWS re:Invent", "aws-reinvent")]
    #[case("a---b", "a-b")]
    #[case("tabs\tand\nnewlines", "tabs-and-newlines")]
    #[case("snake_case_title", "snake-case-title")]
    #[case("- edge -", "edge")]
    #[case("Café Meetup", "caf-meetup")]
    fn normalize_title_produces_expected_base(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(normalize_title(title), expected);
    }

    #[rstest]
    #[case("!!!")]
    #[case("   ")]
    #[case("日本語")]
    fn derive_falls_back_to_timestamp(#[case] title: &str) {
        let slug = Slug::derive(title, fixed_now());
        assert_eq!(slug.as_ref(), "1700000000123");
        assert!(is_valid_slug(slug.as_ref()));
    }

    #[rstest]
    fn with_suffix_appends_counter() {
        let base = Slug::derive("Go Meetup", fixed_now());
        assert_eq!(base.with_suffix(0), base);
        assert_eq!(base.with_suffix(1).as_ref(), "go-meetup-1");
        assert_eq!(base.with_suffix(12).as_ref(), "go-meetup-12");
    }

    #[rstest]
    #[case("", SlugValidationError::Empty)]
    #[case("   ", SlugValidationError::Empty)]
    #[case("my talk", SlugValidationError::InvalidCharacters)]
    #[case("my_talk", SlugValidationError::InvalidCharacters)]
    #[case("../etc", SlugValidationError::InvalidCharacters)]
    fn from_lookup_rejects_invalid_input(
        #[case] input: &str,
        #[case] expected: SlugValidationError,
    ) {
        assert_eq!(Slug::from_lookup(input), Err(expected));
    }

    #[rstest]
    fn from_lookup_lowercases() {
        let slug = Slug::from_lookup("GitHub-Universe-2025").expect("valid slug");
        assert_eq!(slug.as_ref(), "github-universe-2025");
    }

    #[rstest]
    fn deserialising_validates() {
        let ok: Slug = serde_json::from_str("\"go-meetup\"").expect("valid slug");
        assert_eq!(ok.as_ref(), "go-meetup");
        assert!(serde_json::from_str::<Slug>("\"Go Meetup\"").is_err());
    }
}
