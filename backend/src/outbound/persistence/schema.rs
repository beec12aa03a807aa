//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. When a
//! migration changes the schema, regenerate with `diesel print-schema` or edit
//! by hand.

diesel::table! {
    /// Published events.
    ///
    /// `slug` carries a unique index; `tags` carries a GIN index for overlap
    /// queries.
    events (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// URL-safe unique identifier derived from the title.
        slug -> Varchar,
        title -> Text,
        description -> Text,
        overview -> Text,
        /// Image host reference URL.
        image -> Text,
        venue -> Text,
        location -> Text,
        date -> Date,
        time -> Time,
        /// One of `online`, `offline`, `hybrid`.
        mode -> Varchar,
        audience -> Text,
        agenda -> Array<Text>,
        organizer -> Text,
        tags -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Seat reservations. `event_id` is not a foreign key.
    bookings (id) {
        id -> Uuid,
        event_id -> Uuid,
        /// Normalised lowercase address.
        email -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(events, bookings);
