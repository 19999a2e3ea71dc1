//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use quadmarket_core::ExternalUserId;

use crate::config::ApiConfig;
use crate::services::{
    IdentityClient, IdentityError, SearchClient, SearchError, StorageClient, StorageError,
};

/// Verified session tokens are cached briefly to avoid a provider round-trip
/// on every request. Short TTL keeps revocation lag bounded.
const TOKEN_CACHE_TTL: Duration = Duration::from_secs(60);
const TOKEN_CACHE_CAPACITY: u64 = 10_000;

/// Error constructing application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("identity client: {0}")]
    Identity(#[from] IdentityError),
    #[error("search client: {0}")]
    Search(#[from] SearchError),
    #[error("storage client: {0}")]
    Storage(#[from] StorageError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the connection pool, the external
/// service clients, and the token verification cache. There is no other
/// in-process mutable state - the database arbitrates concurrent writes.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    identity: IdentityClient,
    search: SearchClient,
    storage: StorageClient,
    token_cache: Cache<String, ExternalUserId>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if any external service client fails to build.
    pub fn new(config: ApiConfig, pool: PgPool) -> Result<Self, StateError> {
        let identity = IdentityClient::new(&config.identity)?;
        let search = SearchClient::new(&config.search)?;
        let storage = StorageClient::new(&config.storage)?;
        let token_cache = Cache::builder()
            .max_capacity(TOKEN_CACHE_CAPACITY)
            .time_to_live(TOKEN_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                identity,
                search,
                storage,
                token_cache,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the identity provider client.
    #[must_use]
    pub fn identity(&self) -> &IdentityClient {
        &self.inner.identity
    }

    /// Get a reference to the search service client.
    #[must_use]
    pub fn search(&self) -> &SearchClient {
        &self.inner.search
    }

    /// Get a reference to the blob storage client.
    #[must_use]
    pub fn storage(&self) -> &StorageClient {
        &self.inner.storage
    }

    /// Verify a session token, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidToken`] for rejected tokens, other
    /// variants for transport failures. Only successful verifications are
    /// cached.
    pub async fn verify_token(&self, token: &str) -> Result<ExternalUserId, IdentityError> {
        if let Some(cached) = self.inner.token_cache.get(token).await {
            return Ok(cached);
        }

        let external_id = self.inner.identity.verify_token(token).await?;
        self.inner
            .token_cache
            .insert(token.to_owned(), external_id.clone())
            .await;

        Ok(external_id)
    }
}
