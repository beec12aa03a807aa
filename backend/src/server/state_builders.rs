//! Builders wiring outbound adapters into the HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::warn;

use devevent::domain::ports::{
    AnalyticsSink, ImageStore, NoOpAnalyticsSink, UnconfiguredImageStore,
};
use devevent::domain::{BookingService, EventService};
use devevent::inbound::http::state::HttpState;
use devevent::outbound::analytics::HttpAnalyticsSink;
use devevent::outbound::image_host::HttpImageStore;
use devevent::outbound::persistence::{DbPool, DieselBookingRepository, DieselEventRepository};

use super::ServerConfig;

fn build_image_store(config: &ServerConfig) -> std::io::Result<Arc<dyn ImageStore>> {
    match &config.image_host {
        Some(image_host) => {
            let store = HttpImageStore::new(image_host.clone()).map_err(|err| {
                std::io::Error::other(format!("image host client build failed: {err}"))
            })?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("no image host configured; event creation will fail");
            Ok(Arc::new(UnconfiguredImageStore))
        }
    }
}

fn build_analytics_sink(config: &ServerConfig) -> std::io::Result<Arc<dyn AnalyticsSink>> {
    match &config.analytics {
        Some(target) => {
            let sink = HttpAnalyticsSink::new(&target.host, target.api_key.clone(), target.timeout)
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(NoOpAnalyticsSink)),
    }
}

fn build_db_state(
    pool: &DbPool,
    images: Arc<dyn ImageStore>,
    analytics: Arc<dyn AnalyticsSink>,
) -> HttpState {
    let events_repo = Arc::new(DieselEventRepository::new(pool.clone()));
    let bookings_repo = Arc::new(DieselBookingRepository::new(pool.clone()));
    let clock = Arc::new(DefaultClock);

    let events = Arc::new(EventService::new(
        Arc::clone(&events_repo),
        images,
        Arc::clone(&analytics),
        clock.clone(),
    ));
    let bookings = Arc::new(BookingService::new(bookings_repo, events_repo, analytics, clock));

    HttpState::new(events.clone(), events, bookings.clone(), bookings)
}

/// Build HTTP state from configuration.
///
/// A database pool selects the Diesel-backed services; without one every
/// port is a fixture.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let state = match &config.db_pool {
        Some(pool) => build_db_state(
            pool,
            build_image_store(config)?,
            build_analytics_sink(config)?,
        ),
        None => {
            warn!("no database configured; serving fixture ports");
            HttpState::fixtures()
        }
    };
    Ok(web::Data::new(state))
}
