//! Shared validation helpers for inbound HTTP adapters.
//!
//! These cover transport-level checks only (missing fields, path slugs, UUID
//! and base64 decoding). Field semantics are validated by the domain write
//! pipeline.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use crate::domain::{Error, EventId, Slug, SlugValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidSlug,
    InvalidBase64,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidSlug => "invalid_slug",
            ErrorCode::InvalidBase64 => "invalid_base64",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(field, ErrorCode::MissingField, format!("missing required field: {name}"))
}

/// Require an optional payload field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse an event identifier.
pub(crate) fn parse_event_id(value: &str, field: FieldName) -> Result<EventId, Error> {
    EventId::parse(value).map_err(|_| {
        let name = field.as_str();
        field_error(field, ErrorCode::InvalidUuid, format!("{name} must be a valid UUID"))
    })
}

/// Accept a slug from a request path, lowercasing it first.
pub(crate) fn parse_path_slug(value: &str) -> Result<Slug, Error> {
    let field = FieldName::new("slug");
    Slug::from_lookup(value).map_err(|err| match err {
        SlugValidationError::Empty => {
            field_error(field, ErrorCode::InvalidSlug, "Invalid or missing slug parameter")
        }
        SlugValidationError::InvalidCharacters => {
            field_error(field, ErrorCode::InvalidSlug, "Slug contains invalid characters")
        }
    })
}

/// Decode standard base64, tolerating an optional `data:<type>;base64,`
/// prefix.
pub(crate) fn decode_base64(value: &str, field: FieldName) -> Result<Vec<u8>, Error> {
    let trimmed = value.trim();
    let payload = trimmed
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map_or(trimmed, |(_, data)| data);
    STANDARD.decode(payload).map_err(|_| {
        let name = field.as_str();
        field_error(field, ErrorCode::InvalidBase64, format!("{name} must be base64 encoded"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;
    use rstest::rstest;

    fn detail_code(error: &Error) -> Option<&str> {
        error
            .details()
            .and_then(|details| details.get("code"))
            .and_then(|code| code.as_str())
    }

    #[rstest]
    #[case("RustConf-2026", "rustconf-2026")]
    #[case(" go-meetup ", "go-meetup")]
    fn path_slug_is_normalized(#[case] raw: &str, #[case] expected: &str) {
        let slug = parse_path_slug(raw).expect("valid slug");
        assert_eq!(slug.as_ref(), expected);
    }

    #[rstest]
    #[case("", "Invalid or missing slug parameter")]
    #[case("   ", "Invalid or missing slug parameter")]
    #[case("my talk", "Slug contains invalid characters")]
    #[case("drop;table", "Slug contains invalid characters")]
    fn bad_path_slug_is_rejected(#[case] raw: &str, #[case] message: &str) {
        let error = parse_path_slug(raw).expect_err("invalid slug");
        assert_eq!(error.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(error.message(), message);
        assert_eq!(detail_code(&error), Some("invalid_slug"));
    }

    #[rstest]
    #[case("aGVsbG8=")]
    #[case("data:image/png;base64,aGVsbG8=")]
    fn base64_payloads_decode(#[case] raw: &str) {
        let bytes = decode_base64(raw, FieldName::new("image.data")).expect("decodes");
        assert_eq!(bytes, b"hello");
    }

    #[rstest]
    fn invalid_base64_is_rejected() {
        let error = decode_base64("not base64!", FieldName::new("image.data")).expect_err("invalid");
        assert_eq!(detail_code(&error), Some("invalid_base64"));
    }

    #[rstest]
    fn invalid_event_id_is_rejected() {
        let error = parse_event_id("42", FieldName::new("eventId")).expect_err("invalid");
        assert_eq!(error.message(), "eventId must be a valid UUID");
        assert_eq!(detail_code(&error), Some("invalid_uuid"));
    }

    #[rstest]
    fn missing_field_reports_name() {
        let error = require::<String>(None, FieldName::new("email")).expect_err("missing");
        assert_eq!(error.message(), "missing required field: email");
        assert_eq!(detail_code(&error), Some("missing_field"));
    }
}
