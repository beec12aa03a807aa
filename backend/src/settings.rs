//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `DEVEVENT_*` environment variables, or a
//! config file, in that order of precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

use crate::outbound::image_host::ImageHostConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_IMAGE_FOLDER: &str = "devevent";
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ANALYTICS_TIMEOUT_SECS: u64 = 5;

/// Errors raised when settings hold malformed values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not `host:port`.
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    /// A URL setting could not be parsed.
    #[error("invalid URL for {field}: {message}")]
    Url { field: &'static str, message: String },
}

/// Runtime settings for the devevent server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DEVEVENT")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server runs on fixture ports.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Image host upload endpoint. Without one, event creation fails with 503.
    pub image_upload_url: Option<String>,
    /// Unsigned upload preset sent with every upload.
    pub image_upload_preset: Option<String>,
    /// Folder uploads are filed under.
    pub image_folder: Option<String>,
    /// Upload timeout in seconds.
    pub image_timeout_secs: Option<u64>,
    /// Analytics host. Analytics are disabled when this or the key is unset.
    pub analytics_host: Option<String>,
    /// Analytics project API key.
    pub analytics_api_key: Option<String>,
    /// Analytics delivery timeout in seconds.
    pub analytics_timeout_secs: Option<u64>,
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|err| SettingsError::Url {
        field,
        message: err.to_string(),
    })
}

impl ServerSettings {
    /// Address the HTTP listener binds to.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    /// Image host settings, or `None` when no upload endpoint is configured.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Url`] when the endpoint is malformed.
    pub fn image_host(&self) -> Result<Option<ImageHostConfig>, SettingsError> {
        let Some(endpoint) = self.image_upload_url.as_deref() else {
            return Ok(None);
        };
        Ok(Some(ImageHostConfig {
            endpoint: parse_url("image_upload_url", endpoint)?,
            upload_preset: self.image_upload_preset.clone().unwrap_or_default(),
            folder: self
                .image_folder
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_FOLDER.to_owned()),
            timeout: Duration::from_secs(
                self.image_timeout_secs.unwrap_or(DEFAULT_UPLOAD_TIMEOUT_SECS),
            ),
        }))
    }

    /// Analytics host and key, or `None` when analytics are disabled.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Url`] when the host is malformed.
    pub fn analytics(&self) -> Result<Option<(Url, String)>, SettingsError> {
        match (self.analytics_host.as_deref(), self.analytics_api_key.as_deref()) {
            (Some(host), Some(key)) if !key.trim().is_empty() => {
                Ok(Some((parse_url("analytics_host", host)?, key.to_owned())))
            }
            _ => Ok(None),
        }
    }

    /// Timeout applied to analytics deliveries.
    #[must_use]
    pub fn analytics_timeout(&self) -> Duration {
        Duration::from_secs(
            self.analytics_timeout_secs
                .unwrap_or(DEFAULT_ANALYTICS_TIMEOUT_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 10] = [
        "DEVEVENT_BIND_ADDR",
        "DEVEVENT_DATABASE_URL",
        "DEVEVENT_DB_MAX_CONNECTIONS",
        "DEVEVENT_IMAGE_UPLOAD_URL",
        "DEVEVENT_IMAGE_UPLOAD_PRESET",
        "DEVEVENT_IMAGE_FOLDER",
        "DEVEVENT_IMAGE_TIMEOUT_SECS",
        "DEVEVENT_ANALYTICS_HOST",
        "DEVEVENT_ANALYTICS_API_KEY",
        "DEVEVENT_ANALYTICS_TIMEOUT_SECS",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("devevent")]).expect("config should load")
    }

    fn env_with(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_run_without_collaborators() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default bind addr"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid")
        );
        assert!(settings.database_url.is_none());
        assert!(settings.image_host().expect("no endpoint").is_none());
        assert!(settings.analytics().expect("no host").is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("DEVEVENT_BIND_ADDR", "127.0.0.1:9090"),
            ("DEVEVENT_DATABASE_URL", "postgres://localhost/devevent"),
            ("DEVEVENT_IMAGE_UPLOAD_URL", "https://api.images.example/v1_1/demo/image/upload"),
            ("DEVEVENT_IMAGE_UPLOAD_PRESET", "unsigned"),
            ("DEVEVENT_IMAGE_TIMEOUT_SECS", "10"),
            ("DEVEVENT_ANALYTICS_HOST", "https://eu.analytics.example/"),
            ("DEVEVENT_ANALYTICS_API_KEY", "phc_test"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr").to_string(),
            "127.0.0.1:9090"
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/devevent")
        );
        let image_host = settings.image_host().expect("valid").expect("configured");
        assert_eq!(image_host.upload_preset, "unsigned");
        assert_eq!(image_host.folder, DEFAULT_IMAGE_FOLDER);
        assert_eq!(image_host.timeout, Duration::from_secs(10));
        let (host, key) = settings.analytics().expect("valid").expect("configured");
        assert_eq!(host.as_str(), "https://eu.analytics.example/");
        assert_eq!(key, "phc_test");
    }

    #[rstest]
    fn analytics_needs_a_key() {
        let _guard = lock_env(env_with(&[(
            "DEVEVENT_ANALYTICS_HOST",
            "https://eu.analytics.example/",
        )]));

        assert!(load_from_empty_args().analytics().expect("valid").is_none());
    }

    #[rstest]
    fn malformed_values_are_reported() {
        let _guard = lock_env(env_with(&[
            ("DEVEVENT_BIND_ADDR", "localhost"),
            ("DEVEVENT_IMAGE_UPLOAD_URL", "not a url"),
        ]));

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
        assert!(matches!(
            settings.image_host(),
            Err(SettingsError::Url { field: "image_upload_url", .. })
        ));
    }
}
