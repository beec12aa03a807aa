//! Reqwest-backed image host adapter.
//!
//! Uploads go to a Cloudinary-style unsigned upload endpoint as a form
//! carrying a base64 data URI. The reference URL is read from `secure_url`.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::domain::ports::{ImageStore, ImageStoreError, ImageUpload};

const DEFAULT_USER_AGENT: &str = "devevent-backend/0.1";

/// Upload target settings.
#[derive(Debug, Clone)]
pub struct ImageHostConfig {
    /// Full upload URL, for example
    /// `https://api.cloudinary.com/v1_1/<cloud>/image/upload`.
    pub endpoint: Url,
    /// Unsigned upload preset name.
    pub upload_preset: String,
    /// Folder the host files uploads under.
    pub folder: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

/// Image store adapter that POSTs uploads to one endpoint.
pub struct HttpImageStore {
    client: Client,
    endpoint: Url,
    upload_preset: String,
    folder: String,
}

impl HttpImageStore {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: ImageHostConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint,
            upload_preset: config.upload_preset,
            folder: config.folder,
        })
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponseDto {
    secure_url: Option<String>,
}

fn data_uri(upload: &ImageUpload) -> String {
    format!(
        "data:{};base64,{}",
        upload.content_type(),
        STANDARD.encode(&upload.bytes)
    )
}

#[async_trait]
impl ImageStore for HttpImageStore {
    async fn upload(&self, upload: &ImageUpload) -> Result<String, ImageStoreError> {
        let form = [
            ("file", data_uri(upload)),
            ("upload_preset", self.upload_preset.clone()),
            ("folder", self.folder.clone()),
        ];
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_secure_url(body.as_ref())
    }
}

fn parse_secure_url(body: &[u8]) -> Result<String, ImageStoreError> {
    let decoded: UploadResponseDto = serde_json::from_slice(body).map_err(|error| {
        ImageStoreError::decode(format!("invalid upload response: {error}"))
    })?;
    decoded
        .secure_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ImageStoreError::decode("upload response has no secure_url"))
}

fn map_transport_error(error: reqwest::Error) -> ImageStoreError {
    debug!(%error, timeout = error.is_timeout(), "image upload transport failure");
    ImageStoreError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ImageStoreError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let preview = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_CHAR_LIMIT)
        .collect::<String>();
    ImageStoreError::rejected(status.as_u16(), preview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn data_uri_carries_media_type_and_payload() {
        let upload = ImageUpload {
            filename: "banner.png".to_owned(),
            bytes: b"hello".to_vec(),
        };
        assert_eq!(data_uri(&upload), "data:image/png;base64,aGVsbG8=");
    }

    #[rstest]
    fn secure_url_is_extracted() {
        let body = br#"{"public_id":"devevent/abc","secure_url":"https://res.example/abc.png"}"#;
        assert_eq!(
            parse_secure_url(body).expect("decodes"),
            "https://res.example/abc.png"
        );
    }

    #[rstest]
    #[case(&b"not json"[..])]
    #[case(&br#"{"url":"http://res.example/abc.png"}"#[..])]
    #[case(&br#"{"secure_url":"  "}"#[..])]
    fn unusable_responses_are_decode_errors(#[case] body: &[u8]) {
        let error = parse_secure_url(body).expect_err("must fail");
        assert!(matches!(error, ImageStoreError::Decode { .. }));
    }

    #[rstest]
    fn status_errors_keep_code_and_preview() {
        let error = map_status_error(
            StatusCode::BAD_REQUEST,
            b"{\"error\": {\"message\":  \"Upload preset not found\"}}",
        );
        match error {
            ImageStoreError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("Upload preset not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
