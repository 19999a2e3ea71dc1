//! User route handlers: profiles, identity sync, favorites.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use quadmarket_core::{AndrewId, Email, ItemId};

use crate::db::{RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireIdentity;
use crate::models::{NewUser, OwnProfile, ProfileUpdate, PublicProfile};
use crate::routes::{SuccessResponse, require_user};
use crate::state::AppState;

/// Fallback shown until the user uploads their own avatar.
const DEFAULT_AVATAR_PATH: &str = "defaults/avatar.png";

/// Response for a successful identity sync.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub user: OwnProfile,
}

/// What a favorites update does to the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAction {
    Add,
    Remove,
}

/// Fetch another user's redacted profile.
///
/// GET /users/{andrewId}
///
/// # Errors
///
/// 400 on a malformed handle, 401 without identity, 404 unknown handle.
#[instrument(skip(state))]
pub async fn public_profile(
    State(state): State<AppState>,
    Path(andrew_id): Path<String>,
    RequireIdentity(_external_id): RequireIdentity,
) -> Result<Json<PublicProfile>> {
    let andrew_id: AndrewId = andrew_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid andrew id".to_owned()))?;

    let user = UserRepository::new(state.pool())
        .get_by_andrew_id(&andrew_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    Ok(Json(user.into()))
}

/// Fetch the caller's own profile, favorites included.
///
/// POST /users/current
///
/// # Errors
///
/// 401 without identity, 404 if no profile exists yet.
#[instrument(skip_all)]
pub async fn current_profile(
    State(state): State<AppState>,
    RequireIdentity(external_id): RequireIdentity,
) -> Result<Json<OwnProfile>> {
    let caller = require_user(&state, &external_id).await?;
    let favorites = UserRepository::new(state.pool())
        .favorites(caller.id)
        .await?;

    Ok(Json(OwnProfile::new(caller, favorites)))
}

/// Sync the caller's identity into a local profile.
///
/// POST /users/sync
///
/// Idempotent: if a profile already exists for the identity it is returned
/// unchanged. Otherwise the provider record is fetched, the handle derived
/// from the email local-part, and the profile created with defaults.
///
/// # Errors
///
/// 401 without identity, 500 if the provider call or handle derivation fails.
#[instrument(skip_all)]
pub async fn sync(
    State(state): State<AppState>,
    RequireIdentity(external_id): RequireIdentity,
) -> Result<Json<SyncResponse>> {
    let repo = UserRepository::new(state.pool());

    if let Some(existing) = repo.get_by_external_id(&external_id).await? {
        let favorites = repo.favorites(existing.id).await?;
        return Ok(Json(SyncResponse {
            success: true,
            user: OwnProfile::new(existing, favorites),
        }));
    }

    let identity = state.identity().fetch_user(&external_id).await?;

    let email = Email::parse(&identity.email)
        .map_err(|e| AppError::Internal(format!("provider returned invalid email: {e}")))?;
    let andrew_id = AndrewId::from_email(&email)
        .map_err(|e| AppError::Internal(format!("cannot derive handle from email: {e}")))?;

    let storage = &state.config().storage;
    let avatar_url = identity.image_url.or_else(|| {
        Some(format!(
            "{}/{}/{DEFAULT_AVATAR_PATH}",
            storage.public_base_url, storage.bucket
        ))
    });

    let new_user = NewUser {
        external_id: external_id.clone(),
        andrew_id,
        username: identity.username,
        email,
        avatar_url,
    };

    let user = match repo.create(&new_user).await {
        Ok(user) => user,
        // Lost a concurrent-sync race; the winner's row is ours too.
        Err(RepositoryError::Conflict(_)) => repo
            .get_by_external_id(&external_id)
            .await?
            .ok_or_else(|| AppError::Internal("profile vanished after conflict".to_owned()))?,
        Err(e) => return Err(e.into()),
    };

    tracing::info!(andrew_id = %user.andrew_id, "profile created from identity sync");

    Ok(Json(SyncResponse {
        success: true,
        user: OwnProfile::new(user, Vec::new()),
    }))
}

/// Add or remove a favorite. Both directions are idempotent.
///
/// POST /users/favorites
///
/// # Errors
///
/// 400 invalid body, 401 without identity, 404 if the caller has no profile.
#[instrument(skip_all)]
pub async fn update_favorites(
    State(state): State<AppState>,
    RequireIdentity(external_id): RequireIdentity,
    Json(body): Json<Value>,
) -> Result<Json<SuccessResponse>> {
    let caller = require_user(&state, &external_id).await?;
    let (item_id, action) = parse_favorites_request(&body).map_err(AppError::BadRequest)?;

    let repo = UserRepository::new(state.pool());
    match action {
        FavoriteAction::Add => repo.add_favorite(caller.id, item_id).await?,
        FavoriteAction::Remove => repo.remove_favorite(caller.id, item_id).await?,
    }

    Ok(Json(SuccessResponse { success: true }))
}

/// Apply an allow-listed partial update to the caller's profile.
///
/// PUT /users/profile
///
/// Unknown keys are ignored; identity fields cannot be changed here. An empty
/// update is a no-op success.
///
/// # Errors
///
/// 401 without identity, 404 if the caller has no profile.
#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireIdentity(external_id): RequireIdentity,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<SuccessResponse>> {
    let caller = require_user(&state, &external_id).await?;

    if !update.is_empty() {
        UserRepository::new(state.pool())
            .update_profile(caller.id, &update)
            .await?;
    }

    Ok(Json(SuccessResponse { success: true }))
}

/// Validate a favorites-update body into an item id and an action.
pub fn parse_favorites_request(
    body: &Value,
) -> std::result::Result<(ItemId, FavoriteAction), String> {
    let item_id = body
        .get("itemId")
        .and_then(Value::as_str)
        .ok_or_else(|| "itemId is required".to_owned())
        .and_then(|raw| ItemId::parse(raw).map_err(|_| "Invalid item id".to_owned()))?;

    let action = match body.get("action").and_then(Value::as_str) {
        Some("add") => FavoriteAction::Add,
        Some("remove") => FavoriteAction::Remove,
        _ => return Err("action must be 'add' or 'remove'".to_owned()),
    };

    Ok((item_id, action))
}
