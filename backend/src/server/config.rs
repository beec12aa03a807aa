//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use devevent::outbound::image_host::ImageHostConfig;
use devevent::outbound::persistence::DbPool;
use reqwest::Url;

/// Analytics delivery target.
#[derive(Debug, Clone)]
pub struct AnalyticsTarget {
    pub host: Url,
    pub api_key: String,
    pub timeout: Duration,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) image_host: Option<ImageHostConfig>,
    pub(crate) analytics: Option<AnalyticsTarget>,
}

impl ServerConfig {
    /// Construct a configuration with fixture ports and no collaborators.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            image_host: None,
            analytics: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one the server serves the fixture ports.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Upload banners to the configured image host.
    #[must_use]
    pub fn with_image_host(mut self, image_host: Option<ImageHostConfig>) -> Self {
        self.image_host = image_host;
        self
    }

    /// Forward analytics captures to `target`.
    #[must_use]
    pub fn with_analytics(mut self, target: Option<AnalyticsTarget>) -> Self {
        self.analytics = target;
        self
    }
}
