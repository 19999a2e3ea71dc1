//! Managed blob storage client.
//!
//! Uploaded listing images and avatars are written to a storage bucket over
//! HTTP and served from a public base URL. Object paths are chosen by the
//! upload handler; this client only moves bytes.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::StorageConfig;

/// Errors that can occur when writing to blob storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Storage service returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Client construction failed.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Client for the managed blob storage service.
#[derive(Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
    public_base_url: String,
    bucket: String,
}

impl StorageClient {
    /// Create a new storage client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the key is not a
    /// valid header value.
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| StorageError::Parse(format!("invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            public_base_url: config.public_base_url.clone(),
            bucket: config.bucket.clone(),
        })
    }

    /// Upload one object and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload request fails.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn put_object(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let url = format!("{}/{}/{}", self.base_url, self.bucket, path);

        let response = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(format!("{}/{}/{}", self.public_base_url, self.bucket, path))
    }
}
