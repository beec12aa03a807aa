//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed domain entities used by the API and
//! persistence layers, the event write pipeline, and the services behind the
//! driving ports. Nothing here depends on actix, Diesel or reqwest.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload and stable codes.
//! - Event, EventDraft, EventPatch: event aggregate and write inputs.
//! - Slug, EventDate, EventTime: canonical value types.
//! - Booking, Email: booking record and validated attendee address.
//! - EventService, BookingService: driving port implementations.

pub mod booking;
pub mod booking_service;
pub mod error;
pub mod event;
pub mod event_schedule;
pub mod event_service;
pub mod event_write_pipeline;
pub mod ports;
pub mod slug;
pub mod trace_id;

pub use self::booking::{Booking, BookingId, BookingValidationError, Email};
pub use self::booking_service::BookingService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::event::{Event, EventDraft, EventId, EventMode, EventPatch, UnknownEventMode};
pub use self::event_schedule::{EventDate, EventTime, ScheduleValidationError};
pub use self::event_service::{EventService, MAX_SLUG_ATTEMPTS};
pub use self::slug::{Slug, SlugValidationError, normalize_title};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use devevent::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
