//! Port for the external image host that stores event banners.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// The host could not be reached or timed out.
        Transport { message: String } =>
            "image host request failed: {message}",
        /// The host answered but refused the upload.
        Rejected { status: u16, message: String } =>
            "image host rejected upload ({status}): {message}",
        /// The host response could not be interpreted.
        Decode { message: String } =>
            "image host response was malformed: {message}",
    }
}

/// Raw banner image received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Client-side file name, used to guess the media type.
    pub filename: String,
    /// Decoded image bytes.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Media type inferred from the file extension.
    ///
    /// # Examples
    /// ```
    /// use devevent::domain::ports::ImageUpload;
    ///
    /// let upload = ImageUpload { filename: "banner.PNG".into(), bytes: vec![] };
    /// assert_eq!(upload.content_type(), "image/png");
    /// ```
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        let extension = self
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("svg") => "image/svg+xml",
            _ => "application/octet-stream",
        }
    }
}

/// Port for uploading event banners.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Upload `image` and return its stable reference URL.
    async fn upload(&self, image: &ImageUpload) -> Result<String, ImageStoreError>;
}

/// Fixture implementation returning a deterministic placeholder URL.
///
/// For tests only; a running server never stores these URLs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImageStore;

#[async_trait]
impl ImageStore for FixtureImageStore {
    async fn upload(&self, image: &ImageUpload) -> Result<String, ImageStoreError> {
        Ok(format!("https://images.invalid/devevent/{}", image.filename))
    }
}

/// Store used when no image host is configured. Every upload fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredImageStore;

#[async_trait]
impl ImageStore for UnconfiguredImageStore {
    async fn upload(&self, _image: &ImageUpload) -> Result<String, ImageStoreError> {
        Err(ImageStoreError::transport("image host not configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("banner.png", "image/png")]
    #[case("photo.JPEG", "image/jpeg")]
    #[case("anim.gif", "image/gif")]
    #[case("no-extension", "application/octet-stream")]
    fn content_type_follows_extension(#[case] filename: &str, #[case] expected: &str) {
        let upload = ImageUpload {
            filename: filename.to_owned(),
            bytes: Vec::new(),
        };
        assert_eq!(upload.content_type(), expected);
    }

    #[tokio::test]
    async fn fixture_store_echoes_filename() {
        let upload = ImageUpload {
            filename: "banner.png".to_owned(),
            bytes: vec![1, 2, 3],
        };
        let url = FixtureImageStore.upload(&upload).await.expect("upload");
        assert!(url.ends_with("/banner.png"));
    }

    #[tokio::test]
    async fn unconfigured_store_refuses_uploads() {
        let upload = ImageUpload {
            filename: "banner.png".to_owned(),
            bytes: vec![1, 2, 3],
        };
        let error = UnconfiguredImageStore
            .upload(&upload)
            .await
            .expect_err("no host");
        assert!(matches!(error, ImageStoreError::Transport { .. }));
    }
}
