//! Driving port for event reads.

use async_trait::async_trait;

use crate::domain::{Error, Event, Slug};

/// Maximum number of recommendations returned by
/// [`EventQuery::similar_events`].
pub const SIMILAR_EVENTS_LIMIT: usize = 3;

/// Driving port for event listing, detail and recommendations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventQuery: Send + Sync {
    /// Every event, newest first.
    async fn list_events(&self) -> Result<Vec<Event>, Error>;

    /// The event stored under `slug`.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when no event uses the slug and `internal_error`
    /// when the lookup itself fails.
    async fn get_event(&self, slug: &Slug) -> Result<Event, Error>;

    /// Up to [`SIMILAR_EVENTS_LIMIT`] other events sharing a tag with the
    /// event under `slug`.
    ///
    /// Never fails: lookup problems, including an unknown slug, yield an
    /// empty list.
    async fn similar_events(&self, slug: &Slug) -> Vec<Event>;
}

/// Fixture implementation with an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEventQuery;

#[async_trait]
impl EventQuery for FixtureEventQuery {
    async fn list_events(&self) -> Result<Vec<Event>, Error> {
        Ok(Vec::new())
    }

    async fn get_event(&self, slug: &Slug) -> Result<Event, Error> {
        Err(Error::not_found(format!("Event with slug '{slug}' not found")))
    }

    async fn similar_events(&self, _slug: &Slug) -> Vec<Event> {
        Vec::new()
    }
}
