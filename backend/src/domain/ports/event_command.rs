//! Driving port for event writes.
//!
//! HTTP handlers call [`EventCommand`] to create and edit events. The
//! implementation runs the write pipeline, so callers pass raw field values.

use async_trait::async_trait;

use crate::domain::{Error, Event, EventDraft, EventPatch, Slug};

use super::ImageUpload;

/// Request to create an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventRequest {
    /// Raw event fields.
    pub draft: EventDraft,
    /// Banner image to upload before the event is stored.
    pub image: ImageUpload,
}

/// Request to edit an existing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEventRequest {
    /// Slug the event is currently stored under.
    pub slug: Slug,
    /// Fields to change.
    pub patch: EventPatch,
}

/// Driving port for event writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventCommand: Send + Sync {
    /// Upload the banner, validate the fields, assign a unique slug and store
    /// the event.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` for malformed fields, `service_unavailable`
    /// when the image host or store cannot be reached, and `conflict` when no
    /// unique slug could be committed.
    async fn create(&self, request: CreateEventRequest) -> Result<Event, Error>;

    /// Apply `patch` to the event stored under `slug`.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when no event uses the slug, plus the errors listed
    /// for [`Self::create`].
    async fn update(&self, request: UpdateEventRequest) -> Result<Event, Error>;
}

/// Fixture implementation that refuses every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEventCommand;

#[async_trait]
impl EventCommand for FixtureEventCommand {
    async fn create(&self, _request: CreateEventRequest) -> Result<Event, Error> {
        Err(Error::service_unavailable("event storage is not configured"))
    }

    async fn update(&self, request: UpdateEventRequest) -> Result<Event, Error> {
        Err(Error::not_found(format!("event {} not found", request.slug)))
    }
}
