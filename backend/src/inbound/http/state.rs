//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BookingCommand, BookingQuery, EventCommand, EventQuery, FixtureBookings, FixtureEventCommand,
    FixtureEventQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub events: Arc<dyn EventCommand>,
    pub events_query: Arc<dyn EventQuery>,
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
}

impl HttpState {
    /// Construct state from port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use devevent::domain::ports::{FixtureBookings, FixtureEventCommand, FixtureEventQuery};
    /// use devevent::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureEventCommand),
    ///     Arc::new(FixtureEventQuery),
    ///     Arc::new(FixtureBookings),
    ///     Arc::new(FixtureBookings),
    /// );
    /// let _events = state.events.clone();
    /// ```
    pub fn new(
        events: Arc<dyn EventCommand>,
        events_query: Arc<dyn EventQuery>,
        bookings: Arc<dyn BookingCommand>,
        bookings_query: Arc<dyn BookingQuery>,
    ) -> Self {
        Self {
            events,
            events_query,
            bookings,
            bookings_query,
        }
    }

    /// State wired to fixture ports: an empty catalogue that refuses writes.
    pub fn fixtures() -> Self {
        Self::new(
            Arc::new(FixtureEventCommand),
            Arc::new(FixtureEventQuery),
            Arc::new(FixtureBookings),
            Arc::new(FixtureBookings),
        )
    }
}
