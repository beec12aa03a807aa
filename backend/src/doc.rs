//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer plus the
//! domain error schema wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]). The
//! document backs Swagger UI in debug builds and is exported by the
//! `openapi-dump` binary.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "DevEvent backend API",
        description = "Discover, publish, and book developer events."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::get_event,
        crate::inbound::http::events::update_event,
        crate::inbound::http::events::similar_events,
        crate::inbound::http::events::booking_count,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "events", description = "Event discovery and publishing"),
        (name = "bookings", description = "Seat reservations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
