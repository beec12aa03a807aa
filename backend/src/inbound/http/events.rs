//! Event HTTP handlers.
//!
//! ```text
//! GET   /api/v1/events
//! POST  /api/v1/events
//! GET   /api/v1/events/{slug}
//! PATCH /api/v1/events/{slug}
//! GET   /api/v1/events/{slug}/similar
//! GET   /api/v1/events/{slug}/bookings/count
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreateEventRequest, ImageUpload, UpdateEventRequest};
use crate::domain::{Error, Event, EventDraft, EventPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, decode_base64, parse_path_slug};

/// Banner image embedded in a create request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    /// Original file name; the extension selects the media type.
    #[schema(example = "banner.png")]
    pub filename: Option<String>,
    /// Base64 image bytes, optionally as a `data:` URI.
    pub data: Option<String>,
}

/// Request payload for creating an event.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    /// Any common date format; stored as `YYYY-MM-DD`.
    #[schema(example = "Nov 19, 2025")]
    pub date: Option<String>,
    /// Strict 24-hour `HH:MM`.
    #[schema(example = "18:30")]
    pub time: Option<String>,
    /// One of `online`, `offline`, `hybrid`.
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image: Option<ImagePayload>,
}

/// Request payload for editing an event. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Event representation returned by the API.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "go-meetup")]
    pub slug: String,
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    #[schema(example = "2025-11-19")]
    pub date: String,
    #[schema(example = "18:30")]
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id.to_string(),
            slug: event.slug.into(),
            title: event.title,
            description: event.description,
            overview: event.overview,
            image: event.image,
            venue: event.venue,
            location: event.location,
            date: event.date.to_string(),
            time: event.time.to_string(),
            mode: event.mode.to_string(),
            audience: event.audience,
            agenda: event.agenda,
            organizer: event.organizer,
            tags: event.tags,
            created_at: event.created_at.to_rfc3339(),
            updated_at: event.updated_at.to_rfc3339(),
        }
    }
}

/// `{ message, events }` envelope for the listing.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct EventListResponse {
    pub message: String,
    pub events: Vec<EventResponse>,
}

/// `{ message, event }` envelope for writes.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct EventWriteResponse {
    pub message: String,
    pub event: EventResponse,
}

/// `{ success, event }` envelope for the detail lookup.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct EventDetailResponse {
    pub success: bool,
    pub event: EventResponse,
}

/// `{ events }` envelope for recommendations.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SimilarEventsResponse {
    pub events: Vec<EventResponse>,
}

/// `{ count }` envelope for booking totals.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct BookingCountResponse {
    pub count: u64,
}

fn to_responses(events: Vec<Event>) -> Vec<EventResponse> {
    events.into_iter().map(EventResponse::from).collect()
}

fn parse_create_payload(payload: CreateEventPayload) -> Result<CreateEventRequest, Error> {
    let image = payload
        .image
        .and_then(|image| image.data.map(|data| (image.filename, data)))
        .filter(|(_, data)| !data.trim().is_empty())
        .ok_or_else(|| Error::invalid_request("Image file required"))?;
    let (filename, data) = image;
    let bytes = decode_base64(&data, FieldName::new("image.data"))?;

    Ok(CreateEventRequest {
        draft: EventDraft {
            title: payload.title.unwrap_or_default(),
            description: payload.description.unwrap_or_default(),
            overview: payload.overview.unwrap_or_default(),
            venue: payload.venue.unwrap_or_default(),
            location: payload.location.unwrap_or_default(),
            date: payload.date.unwrap_or_default(),
            time: payload.time.unwrap_or_default(),
            mode: payload.mode.unwrap_or_default(),
            audience: payload.audience.unwrap_or_default(),
            agenda: payload.agenda.unwrap_or_default(),
            organizer: payload.organizer.unwrap_or_default(),
            tags: payload.tags.unwrap_or_default(),
        },
        image: ImageUpload {
            filename: filename.unwrap_or_else(|| "banner".to_owned()),
            bytes,
        },
    })
}

impl From<UpdateEventPayload> for EventPatch {
    fn from(payload: UpdateEventPayload) -> Self {
        Self {
            title: payload.title,
            description: payload.description,
            overview: payload.overview,
            venue: payload.venue,
            location: payload.location,
            date: payload.date,
            time: payload.time,
            mode: payload.mode,
            audience: payload.audience,
            agenda: payload.agenda,
            organizer: payload.organizer,
            tags: payload.tags,
        }
    }
}

/// List every event, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    responses(
        (status = 200, description = "All events", body = EventListResponse),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "listEvents"
)]
#[get("/events")]
pub async fn list_events(state: web::Data<HttpState>) -> ApiResult<web::Json<EventListResponse>> {
    let events = state.events_query.list_events().await?;
    Ok(web::Json(EventListResponse {
        message: "Events fetched successfully".to_owned(),
        events: to_responses(events),
    }))
}

/// Create an event, uploading its banner image.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = CreateEventPayload,
    responses(
        (status = 201, description = "Event created", body = EventWriteResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Slug conflict", body = ErrorSchema),
        (status = 503, description = "Store or image host unavailable", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    payload: web::Json<CreateEventPayload>,
) -> ApiResult<HttpResponse> {
    let request = parse_create_payload(payload.into_inner())?;
    let event = state.events.create(request).await?;
    Ok(HttpResponse::Created().json(EventWriteResponse {
        message: "Event created successfully".to_owned(),
        event: event.into(),
    }))
}

/// Fetch one event by slug.
#[utoipa::path(
    get,
    path = "/api/v1/events/{slug}",
    params(("slug" = String, Path, description = "Event slug; case-insensitive")),
    responses(
        (status = 200, description = "Event detail", body = EventDetailResponse),
        (status = 400, description = "Missing or invalid slug", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "getEvent"
)]
#[get("/events/{slug}")]
pub async fn get_event(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<EventDetailResponse>> {
    let slug = parse_path_slug(&path.into_inner())?;
    let event = state.events_query.get_event(&slug).await?;
    Ok(web::Json(EventDetailResponse {
        success: true,
        event: event.into(),
    }))
}

/// Edit an event. A title change re-derives the slug.
#[utoipa::path(
    patch,
    path = "/api/v1/events/{slug}",
    params(("slug" = String, Path, description = "Current event slug")),
    request_body = UpdateEventPayload,
    responses(
        (status = 200, description = "Event updated", body = EventWriteResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema),
        (status = 409, description = "Slug conflict", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "updateEvent"
)]
#[patch("/events/{slug}")]
pub async fn update_event(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateEventPayload>,
) -> ApiResult<web::Json<EventWriteResponse>> {
    let slug = parse_path_slug(&path.into_inner())?;
    let event = state
        .events
        .update(UpdateEventRequest {
            slug,
            patch: payload.into_inner().into(),
        })
        .await?;
    Ok(web::Json(EventWriteResponse {
        message: "Event updated successfully".to_owned(),
        event: event.into(),
    }))
}

/// Up to three events sharing a tag with the given event.
#[utoipa::path(
    get,
    path = "/api/v1/events/{slug}/similar",
    params(("slug" = String, Path, description = "Source event slug")),
    responses(
        (status = 200, description = "Similar events; empty when none or on lookup failure", body = SimilarEventsResponse),
        (status = 400, description = "Invalid slug", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "similarEvents"
)]
#[get("/events/{slug}/similar")]
pub async fn similar_events(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SimilarEventsResponse>> {
    let slug = parse_path_slug(&path.into_inner())?;
    let events = state.events_query.similar_events(&slug).await;
    Ok(web::Json(SimilarEventsResponse {
        events: to_responses(events),
    }))
}

/// Number of bookings recorded for an event.
#[utoipa::path(
    get,
    path = "/api/v1/events/{slug}/bookings/count",
    params(("slug" = String, Path, description = "Event slug")),
    responses(
        (status = 200, description = "Booking count", body = BookingCountResponse),
        (status = 400, description = "Invalid slug", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "countBookings"
)]
#[get("/events/{slug}/bookings/count")]
pub async fn booking_count(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingCountResponse>> {
    let slug = parse_path_slug(&path.into_inner())?;
    let count = state.bookings_query.count_bookings(&slug).await?;
    Ok(web::Json(BookingCountResponse { count }))
}
