//! Port for booking persistence.

use async_trait::async_trait;

use crate::domain::{Booking, EventId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking repository adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "booking repository query failed: {message}",
    }
}

/// Port for booking storage.
///
/// The store does not enforce that `event_id` references an existing event;
/// the booking service checks the reference before calling [`Self::insert`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking.
    async fn insert(&self, booking: &Booking) -> Result<(), BookingRepositoryError>;

    /// Count bookings recorded against `event_id`.
    async fn count_for_event(&self, event_id: EventId) -> Result<u64, BookingRepositoryError>;
}

/// Fixture implementation that discards writes and counts zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookingRepository;

#[async_trait]
impl BookingRepository for FixtureBookingRepository {
    async fn insert(&self, _booking: &Booking) -> Result<(), BookingRepositoryError> {
        Ok(())
    }

    async fn count_for_event(&self, _event_id: EventId) -> Result<u64, BookingRepositoryError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_repository_counts_zero() {
        let count = FixtureBookingRepository
            .count_for_event(EventId::random())
            .await
            .expect("fixture count");
        assert_eq!(count, 0);
    }
}
