//! Booking HTTP handlers.
//!
//! ```text
//! POST /api/v1/bookings {"eventId":"...","email":"ada@example.com"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Booking;
use crate::domain::ports::CreateBookingRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_event_id, require};

const EVENT_ID_FIELD: FieldName = FieldName::new("eventId");
const EMAIL_FIELD: FieldName = FieldName::new("email");

/// Request payload for booking a seat.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingPayload {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub event_id: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
}

/// Booking representation returned by the API.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,
    pub event_id: String,
    pub email: String,
    pub created_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            event_id: booking.event_id.to_string(),
            email: booking.email.into(),
            created_at: booking.created_at.to_rfc3339(),
        }
    }
}

/// `{ message, booking }` envelope.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct BookingCreatedResponse {
    pub message: String,
    pub booking: BookingResponse,
}

/// Book a seat at an existing event.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingPayload,
    responses(
        (status = 201, description = "Booking created", body = BookingCreatedResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 422, description = "Referenced event does not exist", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    payload: web::Json<CreateBookingPayload>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let event_id = require(payload.event_id, EVENT_ID_FIELD)?;
    let event_id = parse_event_id(&event_id, EVENT_ID_FIELD)?;
    let email = require(payload.email, EMAIL_FIELD)?;

    let booking = state
        .bookings
        .create_booking(CreateBookingRequest { event_id, email })
        .await?;
    Ok(HttpResponse::Created().json(BookingCreatedResponse {
        message: "Booking created successfully".to_owned(),
        booking: booking.into(),
    }))
}
