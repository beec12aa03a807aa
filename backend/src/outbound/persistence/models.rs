//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{bookings, events};

/// Row struct for reading from the events table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable and changeset struct for event writes.
///
/// Updates overwrite every column except the primary key and `created_at`.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = events)]
pub(crate) struct EventWriteRow<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub overview: &'a str,
    pub image: &'a str,
    pub venue: &'a str,
    pub location: &'a str,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub mode: &'a str,
    pub audience: &'a str,
    pub agenda: &'a [String],
    pub organizer: &'a str,
    pub tags: &'a [String],
    pub updated_at: DateTime<Utc>,
}

/// Insertable wrapper adding the immutable columns of a new event.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[diesel(embed)]
    pub fields: EventWriteRow<'a>,
}

/// Insertable struct for creating booking records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub id: Uuid,
    pub event_id: Uuid,
    pub email: &'a str,
    pub created_at: DateTime<Utc>,
}
