//! Identity provider client.
//!
//! Authentication is fully delegated: browsers hold a session token minted by
//! the provider, and this client introspects it server-side. The server API
//! key is only used here - it never reaches a response.

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use quadmarket_core::ExternalUserId;

use crate::config::IdentityConfig;

/// Errors that can occur when talking to the identity provider.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The session token was rejected by the provider.
    #[error("invalid session token")]
    InvalidToken,

    /// Provider returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a provider response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Canonical user record held by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityUser {
    /// The provider's opaque user id.
    pub id: String,
    /// Primary email address.
    pub email: String,
    /// Display name, if the user set one.
    pub username: Option<String>,
    /// Provider-hosted avatar.
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    user_id: String,
}

/// Client for the identity provider's server API.
#[derive(Clone)]
pub struct IdentityClient {
    client: reqwest::Client,
    base_url: String,
}

impl IdentityClient {
    /// Create a new identity client authenticated with the server API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the key is not a
    /// valid header value.
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.server_api_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| IdentityError::Parse(format!("invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Introspect a browser session token and return the external user id.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidToken`] for rejected tokens, other
    /// variants for transport or protocol failures.
    #[instrument(skip_all)]
    pub async fn verify_token(&self, token: &str) -> Result<ExternalUserId, IdentityError> {
        let url = format!("{}/v1/tokens/verify", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::NOT_FOUND {
            return Err(IdentityError::InvalidToken);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let verified: VerifyResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))?;

        ExternalUserId::parse(&verified.user_id)
            .map_err(|e| IdentityError::Parse(format!("bad user id in verify response: {e}")))
    }

    /// Fetch the canonical user record for an external id.
    ///
    /// Used once per profile, during sync.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response can't be parsed.
    #[instrument(skip(self))]
    pub async fn fetch_user(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<IdentityUser, IdentityError> {
        let url = format!("{}/v1/users/{}", self.base_url, external_id);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))
    }
}
