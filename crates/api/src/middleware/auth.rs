//! Authentication extractor.
//!
//! Sessions live entirely with the external identity provider; a request is
//! authenticated iff it carries a bearer token the provider accepts. The
//! extractor verifies the token (through the state's short-lived cache) and
//! yields the caller's [`ExternalUserId`].
//!
//! Mapping the identity to a profile row is a separate step with its own
//! failure mode (404 "User not found"), handled where the handlers need it.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use quadmarket_core::ExternalUserId;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires a verified identity on the request.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireIdentity(external_id): RequireIdentity,
/// ) -> impl IntoResponse {
///     format!("hello, {external_id}")
/// }
/// ```
pub struct RequireIdentity(pub ExternalUserId);

impl FromRequestParts<AppState> for RequireIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_owned()))?;

        let external_id = state.verify_token(token).await?;

        Ok(Self(external_id))
    }
}

/// Pull the bearer token out of the Authorization header, if present.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(v) = value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        let (parts, ()) = builder.body(()).expect("request").into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_present() {
        let parts = parts_with_auth(Some("Bearer tok_123"));
        assert_eq!(bearer_token(&parts), Some("tok_123"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let parts = parts_with_auth(None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwdw=="));
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_bearer_token_empty() {
        let parts = parts_with_auth(Some("Bearer "));
        assert_eq!(bearer_token(&parts), None);
    }
}
