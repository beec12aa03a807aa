//! Driving ports for bookings.

use async_trait::async_trait;

use crate::domain::{Booking, Error, EventId, Slug};

/// Request to book a spot at an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookingRequest {
    /// Event being booked.
    pub event_id: EventId,
    /// Raw attendee email; validated by the implementation.
    pub email: String,
}

/// Driving port for booking writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Record a booking after checking the event exists.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` for a malformed email, `unknown_reference`
    /// when the event does not exist, and `service_unavailable` when the
    /// existence check or the write cannot reach the store.
    async fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking, Error>;
}

/// Driving port for booking reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// Number of bookings for the event under `slug`.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when no event uses the slug.
    async fn count_bookings(&self, slug: &Slug) -> Result<u64, Error>;
}

/// Fixture implementation that refuses bookings and counts zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookings;

#[async_trait]
impl BookingCommand for FixtureBookings {
    async fn create_booking(&self, _request: CreateBookingRequest) -> Result<Booking, Error> {
        Err(Error::unknown_reference("Referenced event does not exist"))
    }
}

#[async_trait]
impl BookingQuery for FixtureBookings {
    async fn count_bookings(&self, _slug: &Slug) -> Result<u64, Error> {
        Ok(0)
    }
}
