//! Event aggregate and the raw inputs accepted by the write path.
//!
//! ## Invariants
//! - `slug` is unique across events and matches `^[a-z0-9-]+$`.
//! - `date` and `time` are canonical (`YYYY-MM-DD`, `HH:MM`).
//! - descriptive text fields are trimmed and non-empty.
//! - `tags` and `agenda` are non-empty; `tags` holds no duplicates.
//!
//! Only the write pipeline (`crate::domain::event_write_pipeline`) builds
//! [`Event`] values from caller input, so the invariants hold for every
//! persisted record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{EventDate, EventTime, Slug};

/// Stable event identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
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

    /// Parse an identifier from its string form.
    pub fn parse(value: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(value.trim()).map(Self)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How attendees take part in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventMode {
    /// Streamed or remote only.
    Online,
    /// In person only.
    Offline,
    /// Both in person and remote.
    Hybrid,
}

impl EventMode {
    /// Stable lowercase label used in storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for EventMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode label is not one of the supported values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("mode must be one of online, offline, hybrid")]
pub struct UnknownEventMode;

impl FromStr for EventMode {
    type Err = UnknownEventMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(UnknownEventMode),
        }
    }
}

/// Persisted event record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub slug: Slug,
    pub title: String,
    pub description: String,
    pub overview: String,
    /// Reference URL returned by the image host.
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: EventDate,
    pub time: EventTime,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new event, before validation.
///
/// The banner image travels separately; its reference URL is attached once
/// the upload succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

/// Partial update of an existing event. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl EventPatch {
    /// Return `true` when the patch sets no field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.overview.is_none()
            && self.venue.is_none()
            && self.location.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.mode.is_none()
            && self.audience.is_none()
            && self.agenda.is_none()
            && self.organizer.is_none()
            && self.tags.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("online", EventMode::Online)]
    #[case(" offline ", EventMode::Offline)]
    #[case("hybrid", EventMode::Hybrid)]
    fn mode_parses_known_labels(#[case] input: &str, #[case] expected: EventMode) {
        assert_eq!(input.parse::<EventMode>(), Ok(expected));
    }

    #[rstest]
    #[case("Online")]
    #[case("in-person")]
    #[case("")]
    fn mode_rejects_unknown_labels(#[case] input: &str) {
        assert_eq!(input.parse::<EventMode>(), Err(UnknownEventMode));
    }

    #[rstest]
    fn event_id_parses_and_displays() {
        let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let id = EventId::parse(raw).expect("valid uuid");
        assert_eq!(id.to_string(), raw);
        assert!(EventId::parse("not-a-uuid").is_err());
    }

    #[rstest]
    fn empty_patch_reports_empty() {
        assert!(EventPatch::default().is_empty());
        let patch = EventPatch {
            time: Some("10:00".to_owned()),
            ..EventPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
