//! Canonical event date and time values.
//!
//! Dates are accepted in any of the formats the general parser understands
//! and rewritten as `YYYY-MM-DD`. Times are strict `HH:MM` (24-hour,
//! zero-padded) and are never coerced.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation errors raised by the date and time normalizers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleValidationError {
    /// The date could not be parsed.
    #[error("Invalid date format")]
    InvalidDate {
        /// Raw input as supplied.
        value: String,
    },
    /// The time is not strict `HH:MM`.
    #[error("Time must be in HH:MM format")]
    InvalidTime {
        /// Raw input as supplied.
        value: String,
    },
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

// `%b` and `%B` each accept both abbreviated and full month names.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
    "%a, %b %d, %Y",
    "%A, %B %d, %Y",
];

/// Calendar date of an event, always rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventDate(NaiveDate);

impl EventDate {
    /// Parse `input` with the general date parser and canonicalize it.
    ///
    /// Timestamps carrying an offset are converted to UTC before the date
    /// component is taken.
    ///
    /// # Examples
    /// ```
    /// use devevent::domain::EventDate;
    ///
    /// let date = EventDate::parse("Nov 19, 2025").expect("valid date");
    /// assert_eq!(date.to_string(), "2025-11-19");
    ///
    /// let shifted = EventDate::parse("2025-11-19T23:30:00-05:00").expect("valid timestamp");
    /// assert_eq!(shifted.to_string(), "2025-11-20");
    /// ```
    pub fn parse(input: &str) -> Result<Self, ScheduleValidationError> {
        parse_general_date(input.trim())
            .map(Self)
            .ok_or_else(|| ScheduleValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    /// Wrap an already canonical calendar date.
    #[must_use]
    pub const fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Underlying calendar date.
    #[must_use]
    pub const fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

fn parse_general_date(input: &str) -> Option<NaiveDate> {
    if input.is_empty() {
        return None;
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc2822(input) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    // Timestamps without an offset are read as UTC.
    let from_date_time = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|timestamp| timestamp.date());
    from_date_time.or_else(|| {
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
    })
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<EventDate> for String {
    fn from(value: EventDate) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for EventDate {
    type Error = ScheduleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

static TIME_RE: OnceLock<Regex> = OnceLock::new();

fn time_regex() -> &'static Regex {
    TIME_RE.get_or_init(|| {
        Regex::new("^([0-1][0-9]|2[0-3]):[0-5][0-9]$")
            .unwrap_or_else(|error| panic!("time regex failed to compile: {error}"))
    })
}

/// Start time of an event, always rendered as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventTime(NaiveTime);

impl EventTime {
    /// Validate strict `HH:MM` input after trimming surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use devevent::domain::EventTime;
    ///
    /// assert_eq!(EventTime::parse("09:30").expect("valid").to_string(), "09:30");
    /// assert!(EventTime::parse("9:30").is_err());
    /// assert!(EventTime::parse("12:30pm").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ScheduleValidationError> {
        let invalid = || ScheduleValidationError::InvalidTime {
            value: input.to_owned(),
        };
        let trimmed = input.trim();
        if !time_regex().is_match(trimmed) {
            return Err(invalid());
        }
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Wrap a stored time, dropping seconds and sub-second precision.
    #[must_use]
    pub fn from_naive(time: NaiveTime) -> Self {
        Self(
            NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time),
        )
    }

    /// Underlying wall-clock time.
    #[must_use]
    pub const fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl From<EventTime> for String {
    fn from(value: EventTime) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for EventTime {
    type Error = ScheduleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
