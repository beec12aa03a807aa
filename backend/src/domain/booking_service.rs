//! Booking domain service implementing the booking driving ports.
//!
//! The referenced event is checked at write time only; bookings are not
//! removed or invalidated when their event later disappears.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    AnalyticsEvent, AnalyticsSink, BookingCommand, BookingQuery, BookingRepository,
    BookingRepositoryError, CreateBookingRequest, EventRepository,
};
use crate::domain::{Booking, BookingId, Email, Error, Slug};

/// Booking service implementing [`BookingCommand`] and [`BookingQuery`].
#[derive(Clone)]
pub struct BookingService<B, E> {
    bookings: Arc<B>,
    events: Arc<E>,
    analytics: Arc<dyn AnalyticsSink>,
    clock: Arc<dyn Clock>,
}

impl<B, E> BookingService<B, E> {
    /// Create a new service over the booking and event repositories.
    pub fn new(
        bookings: Arc<B>,
        events: Arc<E>,
        analytics: Arc<dyn AnalyticsSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bookings,
            events,
            analytics,
            clock,
        }
    }
}

impl<B, E> BookingService<B, E>
where
    B: BookingRepository,
    E: EventRepository,
{
    fn map_booking_error(error: BookingRepositoryError) -> Error {
        match error {
            BookingRepositoryError::Connection { message } => {
                error!(%message, "booking repository unavailable");
                Error::service_unavailable("Booking storage is unavailable")
            }
            BookingRepositoryError::Query { message } => {
                error!(%message, "booking repository query failed");
                Error::internal("Booking storage error")
            }
        }
    }
}

#[async_trait]
impl<B, E> BookingCommand for BookingService<B, E>
where
    B: BookingRepository,
    E: EventRepository,
{
    async fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking, Error> {
        let email = Email::new(&request.email).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "email", "code": "invalid_email" }))
        })?;

        let event = match self.events.find_by_id(request.event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                return Err(Error::unknown_reference("Referenced event does not exist")
                    .with_details(json!({ "field": "eventId", "code": "unknown_event" })));
            }
            Err(err) => {
                error!(event_id = %request.event_id, error = %err, "event reference check failed");
                return Err(Error::service_unavailable("Failed to validate event reference"));
            }
        };

        let booking = Booking {
            id: BookingId::random(),
            event_id: event.id,
            email,
            created_at: self.clock.utc(),
        };
        self.bookings
            .insert(&booking)
            .await
            .map_err(Self::map_booking_error)?;
        info!(booking_id = %booking.id, slug = %event.slug, "booking created");

        let capture = AnalyticsEvent::new("booking_created", booking.email.to_string())
            .with_property("eventId", event.id.to_string())
            .with_property("slug", event.slug.to_string());
        if let Err(err) = self.analytics.capture(capture).await {
            warn!(error = %err, "analytics capture failed");
        }
        Ok(booking)
    }
}

#[async_trait]
impl<B, E> BookingQuery for BookingService<B, E>
where
    B: BookingRepository,
    E: EventRepository,
{
    async fn count_bookings(&self, slug: &Slug) -> Result<u64, Error> {
        let event = self
            .events
            .find_by_slug(slug)
            .await
            .map_err(|err| {
                error!(%slug, error = %err, "event lookup for booking count failed");
                Error::service_unavailable("Event storage is unavailable")
            })?
            .ok_or_else(|| Error::not_found("Event not found"))?;
        self.bookings
            .count_for_event(event.id)
            .await
            .map_err(Self::map_booking_error)
    }
}
