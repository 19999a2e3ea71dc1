//! Image upload route handler.
//!
//! Accepts multipart image batches, validates every part before any byte
//! leaves the process, then uploads concurrently and returns public URLs in
//! submission order.

use axum::{Json, extract::Multipart, extract::State};
use chrono::Utc;
use futures::future::try_join_all;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireIdentity;
use crate::routes::require_user;
use crate::state::AppState;

/// One request may carry at most this many images.
pub const MAX_IMAGE_COUNT: usize = 5;

/// Per-image size cap, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Multipart bodies are capped above the worst legal case to leave room for
/// part boundaries and headers.
pub const MAX_UPLOAD_BODY_BYTES: usize = MAX_IMAGE_COUNT * MAX_IMAGE_BYTES + 64 * 1024;

const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Response carrying public URLs in the order the images were submitted.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub urls: Vec<String>,
}

/// One decoded image part, validated before upload.
pub struct ImagePart {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Upload a batch of listing images.
///
/// POST /upload/images
///
/// All validation happens before the first storage write, so a rejected
/// request never leaves partial objects behind. A mid-batch storage failure
/// can; completed objects are not rolled back, only logged.
///
/// # Errors
///
/// 400 invalid batch, 401 without identity, 404 if the caller has no
/// profile, 502 if storage fails.
#[instrument(skip_all)]
pub async fn images(
    State(state): State<AppState>,
    RequireIdentity(external_id): RequireIdentity,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let caller = require_user(&state, &external_id).await?;

    let mut parts: Vec<ImagePart> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("images") {
            continue;
        }

        let filename = field.file_name().unwrap_or("image").to_owned();
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?;

        parts.push(ImagePart {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    validate_batch(&parts).map_err(AppError::BadRequest)?;

    let prefix = format!("{}/{}", caller.andrew_id, Utc::now().timestamp_millis());
    let uploads = parts.into_iter().enumerate().map(|(index, part)| {
        let path = format!("{prefix}-{index}-{}", sanitize_filename(&part.filename));
        let storage = state.storage().clone();
        async move { storage.put_object(&path, &part.content_type, part.bytes).await }
    });

    let urls = try_join_all(uploads).await.inspect_err(|e| {
        // Earlier objects in the batch may already exist; their paths are
        // unreferenced by any listing until the client retries.
        tracing::warn!(error = %e, "image batch partially uploaded");
    })?;

    Ok(Json(UploadResponse { urls }))
}

/// Check the whole batch: count bounds, MIME allow-list, size cap.
pub fn validate_batch(parts: &[ImagePart]) -> std::result::Result<(), String> {
    if parts.is_empty() {
        return Err("No images provided".to_owned());
    }
    if parts.len() > MAX_IMAGE_COUNT {
        return Err(format!("Maximum {MAX_IMAGE_COUNT} images allowed"));
    }

    for part in parts {
        if !ALLOWED_MIME_TYPES.contains(&part.content_type.as_str()) {
            return Err(format!("Unsupported image type: {}", part.content_type));
        }
        if part.bytes.len() > MAX_IMAGE_BYTES {
            return Err(format!("{} exceeds the 5MB size limit", part.filename));
        }
    }

    Ok(())
}

/// Keep object paths flat and URL-safe regardless of the client's filename.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "image".to_owned()
    } else {
        cleaned
    }
}
