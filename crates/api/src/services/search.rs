//! Hosted search service client.
//!
//! Full-text search over listing titles and descriptions lives in a managed
//! service with its own index; this client sends one query call and returns
//! the hits unmodified. The listing store is never consulted on this path.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use quadmarket_core::{ItemCondition, ListingKind};

use crate::config::SearchConfig;

/// Errors that can occur when querying the search service.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// A search query with optional filter predicates.
///
/// Field names match the service's request shape; absent filters are omitted
/// from the payload entirely.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ItemCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_turnaround_days: Option<u32>,
    /// Restrict to one listing kind; both are searched when absent.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ListingKind>,
    pub limit: u32,
}

#[derive(Debug, serde::Deserialize)]
struct SearchResponse {
    results: Vec<Value>,
}

/// Client for the hosted search service.
#[derive(Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    base_url: String,
    index: String,
}

impl SearchClient {
    /// Create a new search client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the key is not a
    /// valid header value.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let mut headers = HeaderMap::new();

        let mut key_header = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| SearchError::Parse(format!("invalid API key format: {e}")))?;
        key_header.set_sensitive(true);
        headers.insert("X-API-Key", key_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            index: config.index.clone(),
        })
    }

    /// Run a query and return the service's hits as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response can't be parsed.
    #[instrument(skip(self), fields(q = %request.q))]
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<Value>, SearchError> {
        let url = format!("{}/v1/indexes/{}/query", self.base_url, self.index);

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        Ok(parsed.results)
    }
}
