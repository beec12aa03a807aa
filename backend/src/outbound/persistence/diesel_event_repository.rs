//! PostgreSQL-backed `EventRepository` implementation using Diesel ORM.
//!
//! Slug uniqueness is enforced by the `events_slug_key` index; violations
//! surface as [`EventRepositoryError::SlugTaken`] so the write pipeline can
//! retry with the next suffix.

use async_trait::async_trait;
use diesel::dsl::{exists, select};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{Event, EventDate, EventId, EventMode, EventTime, Slug};

use super::diesel_basic_error_mapping::{
    is_unique_violation_on, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{EventRow, EventWriteRow, NewEventRow};
use super::pool::{DbPool, PoolError};
use super::schema::events;

const SLUG_CONSTRAINT: &str = "events_slug_key";

/// Diesel-backed implementation of the `EventRepository` port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EventRepositoryError {
    map_basic_pool_error(error, EventRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EventRepositoryError {
    map_basic_diesel_error(
        error,
        EventRepositoryError::query,
        EventRepositoryError::connection,
    )
}

fn map_write_error(error: diesel::result::Error, slug: &Slug) -> EventRepositoryError {
    if is_unique_violation_on(&error, SLUG_CONSTRAINT) {
        EventRepositoryError::slug_taken(slug.as_ref())
    } else {
        map_diesel_error(error)
    }
}

/// Convert a database row into a domain event.
fn row_to_event(row: EventRow) -> Result<Event, EventRepositoryError> {
    let slug = Slug::new(row.slug.as_str()).map_err(|err| {
        EventRepositoryError::query(format!("stored slug {:?} is invalid: {err}", row.slug))
    })?;
    let mode = row.mode.parse::<EventMode>().unwrap_or_else(|_| {
        warn!(
            value = row.mode.as_str(),
            event_id = %row.id,
            "unrecognised mode value, defaulting to offline"
        );
        EventMode::Offline
    });

    Ok(Event {
        id: EventId::from_uuid(row.id),
        slug,
        title: row.title,
        description: row.description,
        overview: row.overview,
        image: row.image,
        venue: row.venue,
        location: row.location,
        date: EventDate::from_naive(row.date),
        time: EventTime::from_naive(row.time),
        mode,
        audience: row.audience,
        agenda: row.agenda,
        organizer: row.organizer,
        tags: row.tags,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn rows_to_events(rows: Vec<EventRow>) -> Result<Vec<Event>, EventRepositoryError> {
    rows.into_iter().map(row_to_event).collect()
}

fn write_row(event: &Event) -> EventWriteRow<'_> {
    EventWriteRow {
        slug: event.slug.as_ref(),
        title: &event.title,
        description: &event.description,
        overview: &event.overview,
        image: &event.image,
        venue: &event.venue,
        location: &event.location,
        date: event.date.as_naive(),
        time: event.time.as_naive(),
        mode: event.mode.as_str(),
        audience: &event.audience,
        agenda: &event.agenda,
        organizer: &event.organizer,
        tags: &event.tags,
        updated_at: event.updated_at,
    }
}

fn clamp_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<EventRow> = events::table
            .filter(events::slug.eq(slug.as_ref()))
            .select(EventRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_event).transpose()
    }

    async fn exists_by_slug_excluding(
        &self,
        slug: &Slug,
        excluding: Option<EventId>,
    ) -> Result<bool, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query: events::BoxedQuery<'_, Pg> = events::table
            .filter(events::slug.eq(slug.as_ref()))
            .into_boxed();
        if let Some(id) = excluding {
            query = query.filter(events::id.ne(*id.as_uuid()));
        }

        select(exists(query))
            .get_result::<bool>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<EventRow> = events::table
            .find(*id.as_uuid())
            .select(EventRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_event).transpose()
    }

    async fn find_by_tags_excluding(
        &self,
        tags: &[String],
        excluding: EventId,
        limit: usize,
    ) -> Result<Vec<Event>, EventRepositoryError> {
        if tags.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<EventRow> = events::table
            .filter(events::tags.overlaps_with(tags))
            .filter(events::id.ne(*excluding.as_uuid()))
            .limit(clamp_limit(limit))
            .select(EventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_events(rows)
    }

    async fn list_recent(&self) -> Result<Vec<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<EventRow> = events::table
            .order(events::created_at.desc())
            .select(EventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_events(rows)
    }

    async fn insert(&self, event: &Event) -> Result<(), EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewEventRow {
            id: *event.id.as_uuid(),
            created_at: event.created_at,
            fields: write_row(event),
        };

        diesel::insert_into(events::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, &event.slug))
    }

    async fn update(&self, event: &Event) -> Result<(), EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(events::table.find(*event.id.as_uuid()))
            .set(&write_row(event))
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, &event.slug))?;

        if updated == 0 {
            return Err(EventRepositoryError::missing(event.id.to_string()));
        }
        Ok(())
    }
}
