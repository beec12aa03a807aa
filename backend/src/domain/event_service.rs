//! Event domain service implementing the event driving ports.
//!
//! Writes run the [`event_write_pipeline`] and then hit the store. The slug
//! probe is check-then-act, so a concurrent writer can still claim the slug
//! first; the store's unique index reports that as
//! [`EventRepositoryError::SlugTaken`] and the write is retried from the next
//! suffix, up to [`MAX_SLUG_ATTEMPTS`] times.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info, warn};

use crate::domain::event_write_pipeline::{self, EventWrite, WriteContext};
use crate::domain::ports::{
    AnalyticsEvent, AnalyticsSink, CreateEventRequest, EventCommand, EventQuery, EventRepository,
    EventRepositoryError, ImageStore, ImageStoreError, SIMILAR_EVENTS_LIMIT, UpdateEventRequest,
};
use crate::domain::{Error, Event, EventId, Slug};

/// Number of store writes attempted before a slug conflict is reported.
pub const MAX_SLUG_ATTEMPTS: u32 = 5;

/// Event service implementing [`EventCommand`] and [`EventQuery`].
#[derive(Clone)]
pub struct EventService<R> {
    repo: Arc<R>,
    images: Arc<dyn ImageStore>,
    analytics: Arc<dyn AnalyticsSink>,
    clock: Arc<dyn Clock>,
}

impl<R> EventService<R> {
    /// Create a new service over the given repository and collaborators.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use devevent::domain::EventService;
    /// # use devevent::domain::ports::{FixtureEventRepository, FixtureImageStore, NoOpAnalyticsSink};
    /// # use mockable::DefaultClock;
    /// let service = EventService::new(
    ///     Arc::new(FixtureEventRepository),
    ///     Arc::new(FixtureImageStore),
    ///     Arc::new(NoOpAnalyticsSink),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        repo: Arc<R>,
        images: Arc<dyn ImageStore>,
        analytics: Arc<dyn AnalyticsSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            images,
            analytics,
            clock,
        }
    }
}

impl<R> EventService<R>
where
    R: EventRepository,
{
    fn map_repository_error(error: EventRepositoryError) -> Error {
        match error {
            EventRepositoryError::Connection { message } => {
                error!(%message, "event repository unavailable");
                Error::service_unavailable("Event storage is unavailable")
            }
            EventRepositoryError::Query { message } => {
                error!(%message, "event repository query failed");
                Error::internal("Event storage error")
            }
            EventRepositoryError::SlugTaken { slug } => {
                Error::conflict(format!("slug '{slug}' is already in use"))
            }
            EventRepositoryError::Missing { id } => {
                warn!(%id, "event vanished before the write landed");
                Error::not_found("Event not found")
            }
        }
    }

    fn map_image_error(error: ImageStoreError) -> Error {
        match error {
            ImageStoreError::Transport { message } => {
                warn!(%message, "image upload transport failed");
                Error::service_unavailable("Image upload failed")
            }
            ImageStoreError::Rejected { status, message } => {
                warn!(status, %message, "image host rejected upload");
                Error::service_unavailable("Image upload failed")
            }
            ImageStoreError::Decode { message } => {
                error!(%message, "image host response invalid");
                Error::internal("Image upload failed")
            }
        }
    }

    async fn load_by_slug(&self, slug: &Slug) -> Result<Event, Error> {
        self.repo
            .find_by_slug(slug)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found("Event not found"))
    }

    /// Run the pipeline and write, re-probing the slug after each conflict.
    async fn persist(
        &self,
        write: &EventWrite,
        image: Option<String>,
        existing: Option<&Event>,
    ) -> Result<Event, Error> {
        let new_id = EventId::random();
        // One timestamp per write keeps the fallback slug base stable across retries.
        let now = self.clock.utc();
        let mut min_suffix = 0;
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let ctx = WriteContext {
                existing,
                new_id,
                now,
                min_suffix,
            };
            let prepared =
                event_write_pipeline::run(self.repo.as_ref(), write, image.clone(), ctx).await?;
            let written = match existing {
                Some(_) => self.repo.update(&prepared.event).await,
                None => self.repo.insert(&prepared.event).await,
            };
            match (written, prepared.slug_suffix) {
                (Ok(()), _) => return Ok(prepared.event),
                (Err(EventRepositoryError::SlugTaken { slug }), Some(suffix)) => {
                    warn!(%slug, attempt, "slug claimed concurrently; retrying write");
                    min_suffix = suffix.saturating_add(1);
                }
                (Err(error), _) => return Err(Self::map_repository_error(error)),
            }
        }
        Err(Error::conflict(format!(
            "could not assign a unique slug after {MAX_SLUG_ATTEMPTS} attempts"
        )))
    }

    async fn capture(&self, event: AnalyticsEvent) {
        let name = event.name.clone();
        if let Err(error) = self.analytics.capture(event).await {
            warn!(%error, event = %name, "analytics capture failed");
        }
    }
}

#[async_trait]
impl<R> EventCommand for EventService<R>
where
    R: EventRepository,
{
    async fn create(&self, request: CreateEventRequest) -> Result<Event, Error> {
        let CreateEventRequest { draft, image } = request;
        if image.bytes.is_empty() {
            return Err(Error::invalid_request("Image file required"));
        }
        let write = EventWrite::from(draft);
        // Reject bad fields before paying for an upload.
        event_write_pipeline::validate_fields(&write.fields, None)?;

        let image_url = self
            .images
            .upload(&image)
            .await
            .map_err(Self::map_image_error)?;
        let event = self.persist(&write, Some(image_url), None).await?;
        info!(slug = %event.slug, id = %event.id, "event created");

        self.capture(
            AnalyticsEvent::new("event_created", event.organizer.clone())
                .with_property("eventId", event.id.to_string())
                .with_property("slug", event.slug.to_string())
                .with_property("mode", event.mode.as_str()),
        )
        .await;
        Ok(event)
    }

    async fn update(&self, request: UpdateEventRequest) -> Result<Event, Error> {
        let existing = self.load_by_slug(&request.slug).await?;
        if request.patch.is_empty() {
            return Ok(existing);
        }
        let write = EventWrite::from(request.patch);
        let event = self.persist(&write, None, Some(&existing)).await?;
        info!(slug = %event.slug, id = %event.id, "event updated");
        Ok(event)
    }
}

#[async_trait]
impl<R> EventQuery for EventService<R>
where
    R: EventRepository,
{
    async fn list_events(&self) -> Result<Vec<Event>, Error> {
        self.repo
            .list_recent()
            .await
            .map_err(Self::map_repository_error)
    }

    async fn get_event(&self, slug: &Slug) -> Result<Event, Error> {
        match self.repo.find_by_slug(slug).await {
            Ok(Some(event)) => Ok(event),
            Ok(None) => Err(Error::not_found("Event not found")),
            Err(err) => {
                error!(%slug, error = %err, "event lookup failed");
                Err(Error::internal("Failed to fetch event"))
            }
        }
    }

    async fn similar_events(&self, slug: &Slug) -> Vec<Event> {
        let source = match self.repo.find_by_slug(slug).await {
            Ok(Some(source)) => source,
            Ok(None) => {
                warn!(%slug, "similar events requested for unknown slug");
                return Vec::new();
            }
            Err(error) => {
                warn!(%slug, %error, "similar events source lookup failed");
                return Vec::new();
            }
        };
        match self
            .repo
            .find_by_tags_excluding(&source.tags, source.id, SIMILAR_EVENTS_LIMIT)
            .await
        {
            Ok(events) => events
                .into_iter()
                .filter(|event| event.id != source.id)
                .take(SIMILAR_EVENTS_LIMIT)
                .collect(),
            Err(error) => {
                warn!(%slug, %error, "similar events lookup failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "event_service_tests.rs"]
mod tests;
