//! Domain port for forwarding product analytics events.
//!
//! Captures are fire-and-forget: callers log failures and carry on, and
//! adapters should hand delivery to a background task rather than hold the
//! request open.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::define_port_error;

define_port_error! {
    /// Errors exposed when handing an event to the analytics service.
    pub enum AnalyticsSinkError {
        /// The event could not be queued for delivery.
        Dispatch { message: String } => "analytics capture failed: {message}",
    }
}

/// A named analytics event with free-form properties.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsEvent {
    /// Event name, for example `event_created`.
    pub name: String,
    /// Identity the event is attributed to.
    pub distinct_id: String,
    /// Additional properties sent with the event.
    pub properties: Map<String, Value>,
}

impl AnalyticsEvent {
    /// Start an event with no properties.
    #[must_use]
    pub fn new(name: impl Into<String>, distinct_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            distinct_id: distinct_id.into(),
            properties: Map::new(),
        }
    }

    /// Attach a property, replacing any previous value under `key`.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Analytics capture port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Queue `event` for delivery.
    async fn capture(&self, event: AnalyticsEvent) -> Result<(), AnalyticsSinkError>;
}

/// No-op implementation for when analytics are disabled or in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAnalyticsSink;

#[async_trait]
impl AnalyticsSink for NoOpAnalyticsSink {
    async fn capture(&self, _event: AnalyticsEvent) -> Result<(), AnalyticsSinkError> {
        Ok(())
    }
}
