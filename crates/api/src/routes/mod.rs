//! HTTP route handlers and router assembly.

use axum::{
    Json,
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Serialize;

use quadmarket_core::ExternalUserId;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::state::AppState;

pub mod items;
pub mod search;
pub mod upload;
pub mod users;

/// Generic `{"success": true}` response body.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Resolve a verified identity to its profile row.
///
/// Authentication proves who the caller is; this proves they have onboarded.
/// Every profile-bound operation runs this check right after the extractor.
///
/// # Errors
///
/// 404 "User not found" when the identity has no profile yet.
pub async fn require_user(state: &AppState, external_id: &ExternalUserId) -> Result<User> {
    UserRepository::new(state.pool())
        .get_by_external_id(external_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let items = Router::new()
        .route("/create", post(items::create))
        .route("/{type}/{id}/status", put(items::update_status));

    let users = Router::new()
        .route("/current", post(users::current_profile))
        .route("/sync", post(users::sync))
        .route("/favorites", post(users::update_favorites))
        .route("/profile", put(users::update_profile))
        .route("/{andrew_id}", get(users::public_profile))
        .route("/{andrew_id}/items/{type}", get(items::seller_items));

    let uploads = Router::new()
        .route("/images", post(upload::images))
        .layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BODY_BYTES));

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .route("/search", get(search::search))
        .nest("/items", items)
        .nest("/users", users)
        .nest("/upload", uploads)
        .fallback(not_found)
        .with_state(state)
}

/// Liveness probe. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness probe: 503 until the database is reachable.
async fn ready(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Fallback for unmatched paths.
pub async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}
