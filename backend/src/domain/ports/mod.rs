//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`ImageStore`], [`AnalyticsSink`]) are
//! implemented by outbound adapters. Driving ports ([`EventCommand`],
//! [`EventQuery`], [`BookingCommand`], [`BookingQuery`]) are implemented by
//! domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod analytics_sink;
mod booking_command;
mod booking_repository;
mod event_command;
mod event_query;
mod event_repository;
mod image_store;

#[cfg(test)]
pub use analytics_sink::MockAnalyticsSink;
pub use analytics_sink::{AnalyticsEvent, AnalyticsSink, AnalyticsSinkError, NoOpAnalyticsSink};
#[cfg(test)]
pub use booking_command::{MockBookingCommand, MockBookingQuery};
pub use booking_command::{BookingCommand, BookingQuery, CreateBookingRequest, FixtureBookings};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingRepository, BookingRepositoryError, FixtureBookingRepository};
#[cfg(test)]
pub use event_command::MockEventCommand;
pub use event_command::{
    CreateEventRequest, EventCommand, FixtureEventCommand, UpdateEventRequest,
};
#[cfg(test)]
pub use event_query::MockEventQuery;
pub use event_query::{EventQuery, FixtureEventQuery, SIMILAR_EVENTS_LIMIT};
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventRepository, EventRepositoryError, FixtureEventRepository};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{
    FixtureImageStore, ImageStore, ImageStoreError, ImageUpload, UnconfiguredImageStore,
};
