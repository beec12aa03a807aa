//! Reqwest-backed analytics adapter for PostHog-style `/capture/` endpoints.
//!
//! Delivery runs on a spawned task so a slow or failing analytics service
//! never holds the request open. The task inherits the request trace id.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::TraceId;
use crate::domain::ports::{AnalyticsEvent, AnalyticsSink, AnalyticsSinkError};

/// Analytics sink that posts each capture to a single endpoint.
pub struct HttpAnalyticsSink {
    inner: Arc<Inner>,
}

struct Inner {
    client: Client,
    endpoint: Url,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct CapturePayload<'a> {
    api_key: &'a str,
    event: &'a str,
    distinct_id: &'a str,
    properties: &'a Map<String, Value>,
}

impl HttpAnalyticsSink {
    /// Build a sink posting to `{host}/capture/`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// capture URL cannot be derived from `host`.
    pub fn new(host: &Url, api_key: impl Into<String>, timeout: Duration) -> Result<Self, AnalyticsSinkError> {
        let endpoint = host
            .join("capture/")
            .map_err(|err| AnalyticsSinkError::dispatch(format!("invalid analytics host: {err}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AnalyticsSinkError::dispatch(err.to_string()))?;
        Ok(Self {
            inner: Arc::new(Inner {
                client,
                endpoint,
                api_key: api_key.into(),
            }),
        })
    }
}

impl Inner {
    async fn deliver(&self, event: AnalyticsEvent) {
        let payload = CapturePayload {
            api_key: &self.api_key,
            event: &event.name,
            distinct_id: &event.distinct_id,
            properties: &event.properties,
        };
        match self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                debug!(event = %event.name, "analytics event delivered");
            }
            Ok(response) => {
                warn!(event = %event.name, status = response.status().as_u16(), "analytics service rejected event");
            }
            Err(error) => {
                warn!(event = %event.name, %error, "analytics delivery failed");
            }
        }
    }
}

#[async_trait]
impl AnalyticsSink for HttpAnalyticsSink {
    async fn capture(&self, event: AnalyticsEvent) -> Result<(), AnalyticsSinkError> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(TraceId::bind_current(async move {
            inner.deliver(event).await;
        }));
        Ok(())
    }
}
