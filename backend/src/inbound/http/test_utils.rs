//! Test helpers for inbound HTTP components.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use serde_json::Value;

use crate::inbound::http::state::HttpState;
use crate::inbound::http::{bookings, events};

/// Build an app exposing every event and booking route under `/api/v1`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .service(events::list_events)
            .service(events::create_event)
            .service(events::similar_events)
            .service(events::booking_count)
            .service(events::get_event)
            .service(events::update_event)
            .service(bookings::create_booking),
    )
}

/// Read a response body as JSON.
pub async fn read_json(response: ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON response body")
}
