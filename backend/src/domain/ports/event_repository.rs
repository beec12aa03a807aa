//! Port for event persistence.
//!
//! The [`EventRepository`] trait is the store lookup capability used by the
//! write pipeline (slug probes), the similar-events lookup and the booking
//! referential check. Adapters must enforce slug uniqueness at the storage
//! level and report violations as [`EventRepositoryError::SlugTaken`].

use async_trait::async_trait;

use crate::domain::{Event, EventId, Slug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by event repository adapters.
    pub enum EventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "event repository query failed: {message}",
        /// The unique slug constraint rejected the write.
        SlugTaken { slug: String } =>
            "slug already in use: {slug}",
        /// An update targeted an event that no longer exists.
        Missing { id: String } =>
            "event {id} does not exist",
    }
}

/// Port for event storage and lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Fetch the event stored under `slug`.
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Event>, EventRepositoryError>;

    /// Report whether any event other than `excluding` uses `slug`.
    async fn exists_by_slug_excluding(
        &self,
        slug: &Slug,
        excluding: Option<EventId>,
    ) -> Result<bool, EventRepositoryError>;

    /// Fetch an event by identifier.
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError>;

    /// Return up to `limit` events sharing at least one of `tags`, never
    /// including `excluding`. Ordering is left to the store.
    async fn find_by_tags_excluding(
        &self,
        tags: &[String],
        excluding: EventId,
        limit: usize,
    ) -> Result<Vec<Event>, EventRepositoryError>;

    /// Return every event, newest first.
    async fn list_recent(&self) -> Result<Vec<Event>, EventRepositoryError>;

    /// Persist a new event.
    ///
    /// Returns [`EventRepositoryError::SlugTaken`] when the slug is already
    /// stored.
    async fn insert(&self, event: &Event) -> Result<(), EventRepositoryError>;

    /// Overwrite the stored event with the same identifier.
    ///
    /// Returns [`EventRepositoryError::SlugTaken`] when the new slug belongs to
    /// another event and [`EventRepositoryError::Missing`] when the row is gone.
    async fn update(&self, event: &Event) -> Result<(), EventRepositoryError>;
}

/// Fixture implementation holding no events.
///
/// Lookups find nothing and writes are discarded. Used when the server runs
/// without a database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEventRepository;

#[async_trait]
impl EventRepository for FixtureEventRepository {
    async fn find_by_slug(&self, _slug: &Slug) -> Result<Option<Event>, EventRepositoryError> {
        Ok(None)
    }

    async fn exists_by_slug_excluding(
        &self,
        _slug: &Slug,
        _excluding: Option<EventId>,
    ) -> Result<bool, EventRepositoryError> {
        Ok(false)
    }

    async fn find_by_id(&self, _id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        Ok(None)
    }

    async fn find_by_tags_excluding(
        &self,
        _tags: &[String],
        _excluding: EventId,
        _limit: usize,
    ) -> Result<Vec<Event>, EventRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_recent(&self) -> Result<Vec<Event>, EventRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _event: &Event) -> Result<(), EventRepositoryError> {
        Ok(())
    }

    async fn update(&self, event: &Event) -> Result<(), EventRepositoryError> {
        Err(EventRepositoryError::missing(event.id.to_string()))
    }
}
