//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`). The
//! module is compiled for tests and when the `test-support` feature is on.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::domain::ports::{
    AnalyticsEvent, AnalyticsSink, AnalyticsSinkError, BookingRepository, BookingRepositoryError,
    EventRepository, EventRepositoryError,
};
use crate::domain::{
    Booking, Event, EventDate, EventDraft, EventId, EventMode, EventTime, Slug,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// A complete, valid draft titled `title`.
///
/// # Examples
/// ```
/// use devevent::test_support::sample_draft;
///
/// let draft = sample_draft("Go Meetup");
/// assert_eq!(draft.mode, "offline");
/// ```
pub fn sample_draft(title: &str) -> EventDraft {
    EventDraft {
        title: title.to_owned(),
        description: "An evening of talks and hacking.".to_owned(),
        overview: "Lightning talks followed by open hacking.".to_owned(),
        venue: "Main Hall".to_owned(),
        location: "Berlin, Germany".to_owned(),
        date: "2026-05-20".to_owned(),
        time: "18:00".to_owned(),
        mode: "offline".to_owned(),
        audience: "Developers".to_owned(),
        agenda: vec!["Welcome".to_owned(), "Talks".to_owned()],
        organizer: "Berlin Devs".to_owned(),
        tags: vec!["go".to_owned(), "backend".to_owned()],
    }
}

/// A stored event with a random id and the given title and slug.
///
/// # Panics
/// Panics when `slug` is not a valid slug.
pub fn sample_event(title: &str, slug: &str) -> Event {
    let timestamp = fixed_timestamp();
    Event {
        id: EventId::random(),
        slug: Slug::new(slug).unwrap_or_else(|err| panic!("invalid sample slug {slug}: {err}")),
        title: title.to_owned(),
        description: "An evening of talks and hacking.".to_owned(),
        overview: "Lightning talks followed by open hacking.".to_owned(),
        image: "https://img.example/devevent/banner.png".to_owned(),
        venue: "Main Hall".to_owned(),
        location: "Berlin, Germany".to_owned(),
        date: EventDate::from_naive(
            NaiveDate::from_ymd_opt(2026, 5, 20).unwrap_or_default(),
        ),
        time: EventTime::from_naive(
            NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
        ),
        mode: EventMode::Offline,
        audience: "Developers".to_owned(),
        agenda: vec!["Welcome".to_owned(), "Talks".to_owned()],
        organizer: "Berlin Devs".to_owned(),
        tags: vec!["go".to_owned(), "backend".to_owned()],
        created_at: timestamp,
        updated_at: timestamp,
    }
}

/// In-memory event and booking store.
///
/// Enforces slug uniqueness on write like the database's unique index, so
/// write-path retries can be exercised without PostgreSQL.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    events: Mutex<Vec<Event>>,
    bookings: Mutex<Vec<Booking>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `events`.
    #[must_use]
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: Mutex::new(events),
            bookings: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the stored events in insertion order.
    pub fn events(&self) -> Vec<Event> {
        lock(&self.events).clone()
    }

    /// Snapshot of the stored bookings in insertion order.
    pub fn bookings(&self) -> Vec<Booking> {
        lock(&self.bookings).clone()
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Event>, EventRepositoryError> {
        Ok(lock(&self.events)
            .iter()
            .find(|event| &event.slug == slug)
            .cloned())
    }

    async fn exists_by_slug_excluding(
        &self,
        slug: &Slug,
        excluding: Option<EventId>,
    ) -> Result<bool, EventRepositoryError> {
        Ok(lock(&self.events)
            .iter()
            .any(|event| &event.slug == slug && Some(event.id) != excluding))
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        Ok(lock(&self.events)
            .iter()
            .find(|event| event.id == id)
            .cloned())
    }

    async fn find_by_tags_excluding(
        &self,
        tags: &[String],
        excluding: EventId,
        limit: usize,
    ) -> Result<Vec<Event>, EventRepositoryError> {
        Ok(lock(&self.events)
            .iter()
            .filter(|event| event.id != excluding)
            .filter(|event| event.tags.iter().any(|tag| tags.contains(tag)))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_recent(&self) -> Result<Vec<Event>, EventRepositoryError> {
        let mut events = lock(&self.events).clone();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn insert(&self, event: &Event) -> Result<(), EventRepositoryError> {
        let mut events = lock(&self.events);
        if events.iter().any(|stored| stored.slug == event.slug) {
            return Err(EventRepositoryError::slug_taken(event.slug.to_string()));
        }
        events.push(event.clone());
        Ok(())
    }

    async fn update(&self, event: &Event) -> Result<(), EventRepositoryError> {
        let mut events = lock(&self.events);
        if events
            .iter()
            .any(|stored| stored.slug == event.slug && stored.id != event.id)
        {
            return Err(EventRepositoryError::slug_taken(event.slug.to_string()));
        }
        let stored = events
            .iter_mut()
            .find(|stored| stored.id == event.id)
            .ok_or_else(|| EventRepositoryError::missing(event.id.to_string()))?;
        *stored = event.clone();
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn insert(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        lock(&self.bookings).push(booking.clone());
        Ok(())
    }

    async fn count_for_event(&self, event_id: EventId) -> Result<u64, BookingRepositoryError> {
        let count = lock(&self.bookings)
            .iter()
            .filter(|booking| booking.event_id == event_id)
            .count();
        u64::try_from(count).map_err(|err| BookingRepositoryError::query(err.to_string()))
    }
}

/// Analytics sink that keeps every captured event in memory.
#[derive(Debug, Default)]
pub struct RecordingAnalyticsSink {
    captured: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingAnalyticsSink {
    /// Names of the captured events in capture order.
    pub fn names(&self) -> Vec<String> {
        lock(&self.captured)
            .iter()
            .map(|event| event.name.clone())
            .collect()
    }

    /// Every captured event.
    pub fn captured(&self) -> Vec<AnalyticsEvent> {
        lock(&self.captured).clone()
    }
}

#[async_trait]
impl AnalyticsSink for RecordingAnalyticsSink {
    async fn capture(&self, event: AnalyticsEvent) -> Result<(), AnalyticsSinkError> {
        lock(&self.captured).push(event);
        Ok(())
    }
}
