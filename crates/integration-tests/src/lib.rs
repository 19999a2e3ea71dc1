//! Integration tests for QuadMarket.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p quadmarket-cli -- migrate
//!
//! # Start the API
//! cargo run -p quadmarket-api
//!
//! # Run integration tests (all are #[ignore]-gated)
//! cargo test -p quadmarket-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `API_BASE_URL` - API under test (default: `http://localhost:3000`)
//! - `TEST_SESSION_TOKEN` - Valid identity-provider session token for the
//!   primary test account
//! - `TEST_SESSION_TOKEN_2` - Token for a second account (ownership tests)

use reqwest::Client;

/// Base URL for the API under test.
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Session token for the primary test account.
///
/// # Panics
///
/// Panics when the variable is unset; the ignored tests require it.
#[must_use]
pub fn session_token() -> String {
    std::env::var("TEST_SESSION_TOKEN").expect("TEST_SESSION_TOKEN must be set")
}

/// Session token for a second account, used by ownership tests.
///
/// # Panics
///
/// Panics when the variable is unset; the ignored tests require it.
#[must_use]
pub fn second_session_token() -> String {
    std::env::var("TEST_SESSION_TOKEN_2").expect("TEST_SESSION_TOKEN_2 must be set")
}

/// Plain HTTP client; authentication is per-request via bearer headers.
///
/// # Panics
///
/// Panics if the client fails to build.
#[must_use]
pub fn client() -> Client {
    Client::builder().build().expect("Failed to create HTTP client")
}
