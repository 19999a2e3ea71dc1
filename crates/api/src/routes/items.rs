//! Listing route handlers: creation, status updates, per-seller reads.
//!
//! Validation runs in full before any store write; the field checks are pure
//! functions so the contract is testable without a database.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use quadmarket_core::{ItemCondition, ItemId, ListingKind, Price};

use crate::db::ItemRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireIdentity;
use crate::models::NewListing;
use crate::routes::{SuccessResponse, require_user};
use crate::state::AppState;

/// Listings may carry at most this many images.
pub const MAX_LISTING_IMAGES: usize = 5;

/// Response for a successful creation.
#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub success: bool,
    #[serde(rename = "itemId")]
    pub item_id: ItemId,
}

/// The two shapes a status update can take, depending on the listing kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Commission items toggle a strict boolean.
    Availability(bool),
    /// Marketplace items overwrite a free-form status string.
    Status(String),
}

/// Create a listing of either kind.
///
/// POST /items/create
///
/// # Errors
///
/// 400 for missing/invalid fields, 401 without identity, 404 if the caller
/// has no profile.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireIdentity(external_id): RequireIdentity,
    Json(body): Json<Value>,
) -> Result<Json<CreateResponse>> {
    let caller = require_user(&state, &external_id).await?;

    let listing = parse_create_request(&body).map_err(AppError::BadRequest)?;

    let repo = ItemRepository::new(state.pool());
    let item_id = match listing.kind {
        ListingKind::Marketplace => repo.create_marketplace(&caller.andrew_id, &listing).await?,
        ListingKind::Commission => repo.create_commission(&caller.andrew_id, &listing).await?,
    };

    tracing::info!(%item_id, kind = %listing.kind, seller = %caller.andrew_id, "listing created");

    Ok(Json(CreateResponse {
        success: true,
        item_id,
    }))
}

/// Update a listing's status (marketplace) or availability (commission).
///
/// PUT /items/{type}/{id}/status
///
/// Owner-only. The order of checks is fixed: identity, caller profile, item
/// existence, ownership, body shape - no write happens before all five pass.
///
/// # Errors
///
/// 400 invalid type/body, 401, 403 non-owner, 404 missing user/item.
#[instrument(skip(state, body))]
pub async fn update_status(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    RequireIdentity(external_id): RequireIdentity,
    Json(body): Json<Value>,
) -> Result<Json<SuccessResponse>> {
    let kind: ListingKind = kind
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid item type".to_owned()))?;

    let caller = require_user(&state, &external_id).await?;

    let item_id =
        ItemId::parse(&id).map_err(|_| AppError::NotFound("Item not found".to_owned()))?;

    let repo = ItemRepository::new(state.pool());

    // Load first so a non-owner gets 403 even with a malformed body.
    let seller = match kind {
        ListingKind::Marketplace => repo
            .marketplace_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_owned()))?
            .seller_andrew_id,
        ListingKind::Commission => repo
            .commission_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_owned()))?
            .seller_andrew_id,
    };

    if seller != caller.andrew_id {
        return Err(AppError::Forbidden(
            "You do not have permission to update this item".to_owned(),
        ));
    }

    match parse_status_update(kind, &body).map_err(AppError::BadRequest)? {
        StatusUpdate::Availability(is_available) => {
            repo.set_commission_availability(item_id, is_available)
                .await?;
        }
        StatusUpdate::Status(status) => {
            repo.set_marketplace_status(item_id, &status).await?;
        }
    }

    Ok(Json(SuccessResponse { success: true }))
}

/// List a seller's items of one kind. Public read.
///
/// GET /users/{andrewId}/items/{type}
///
/// # Errors
///
/// 400 on an unknown kind or malformed handle.
#[instrument(skip(state))]
pub async fn seller_items(
    State(state): State<AppState>,
    Path((andrew_id, kind)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let kind: ListingKind = kind
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid item type".to_owned()))?;

    let andrew_id = andrew_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid andrew id".to_owned()))?;

    let repo = ItemRepository::new(state.pool());
    let items = match kind {
        ListingKind::Marketplace => {
            serde_json::to_value(repo.marketplace_by_seller(&andrew_id).await?)
        }
        ListingKind::Commission => {
            serde_json::to_value(repo.commission_by_seller(&andrew_id).await?)
        }
    }
    .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(items))
}

// =============================================================================
// Validation
// =============================================================================

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    let s = value?.as_str()?.trim();
    if s.is_empty() { None } else { Some(s.to_owned()) }
}

fn string_array(value: Option<&Value>) -> Option<Vec<String>> {
    value?
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_owned))
        .collect()
}

/// Validate a creation payload into a [`NewListing`].
///
/// Checks, in order: known `type`; the required base fields (title,
/// description, price, category, at least one image); price coercion; the
/// image cap; and, for marketplace items, a valid `condition`.
pub fn parse_create_request(body: &Value) -> std::result::Result<NewListing, String> {
    let kind: ListingKind = body
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| "Invalid item type".to_owned())?
        .parse()
        .map_err(|_| "Invalid item type".to_owned())?;

    let title = non_empty_string(body.get("title"));
    let description = non_empty_string(body.get("description"));
    let category = non_empty_string(body.get("category"));
    let images = string_array(body.get("images")).unwrap_or_default();
    let has_price = body.get("price").is_some_and(|p| !p.is_null());

    let (Some(title), Some(description), Some(category), true) =
        (title, description, category, has_price)
    else {
        return Err("Missing required fields".to_owned());
    };
    if images.is_empty() {
        return Err("Missing required fields".to_owned());
    }
    if images.len() > MAX_LISTING_IMAGES {
        return Err(format!("Maximum {MAX_LISTING_IMAGES} images allowed"));
    }

    // Price arrives as a JSON number or a numeric string.
    let price = body
        .get("price")
        .map(Price::coerce)
        .transpose()
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "Missing required fields".to_owned())?;

    let tags = string_array(body.get("tags")).unwrap_or_default();

    let condition = match kind {
        ListingKind::Marketplace => {
            let raw = non_empty_string(body.get("condition"))
                .ok_or_else(|| "Condition is required for marketplace items".to_owned())?;
            let condition: ItemCondition = raw
                .parse()
                .map_err(|_| format!("Invalid condition: {raw}"))?;
            Some(condition)
        }
        ListingKind::Commission => None,
    };

    Ok(NewListing {
        kind,
        title,
        description,
        price,
        category,
        tags,
        images,
        condition,
    })
}

/// Validate a status-update body against the listing kind.
///
/// Commission items demand a strict JSON boolean `isAvailable`; marketplace
/// items demand a non-empty string `status`, stored verbatim.
pub fn parse_status_update(
    kind: ListingKind,
    body: &Value,
) -> std::result::Result<StatusUpdate, String> {
    match kind {
        ListingKind::Commission => match body.get("isAvailable") {
            Some(Value::Bool(b)) => Ok(StatusUpdate::Availability(*b)),
            _ => Err("isAvailable must be a boolean".to_owned()),
        },
        ListingKind::Marketplace => non_empty_string(body.get("status"))
            .map(StatusUpdate::Status)
            .ok_or_else(|| "status must be a non-empty string".to_owned()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn marketplace_body() -> Value {
        json!({
            "type": "marketplace",
            "title": "Desk lamp",
            "description": "Barely used",
            "price": 15.50,
            "category": "Furniture",
            "tags": ["dorm", "lighting"],
            "images": ["https://cdn.example.com/a.jpg"],
            "condition": "Like New"
        })
    }

    #[test]
    fn test_create_marketplace_valid() {
        let listing = parse_create_request(&marketplace_body()).unwrap();
        assert_eq!(listing.kind, ListingKind::Marketplace);
        assert_eq!(listing.condition, Some(ItemCondition::LikeNew));
        assert_eq!(listing.tags, vec!["dorm", "lighting"]);
    }

    #[test]
    fn test_create_rejects_unknown_type() {
        let mut body = marketplace_body();
        body["type"] = json!("sublet");
        assert_eq!(
            parse_create_request(&body).unwrap_err(),
            "Invalid item type"
        );
    }

    #[test]
    fn test_create_missing_any_required_field_is_rejected() {
        for field in ["title", "description", "price", "category", "images"] {
            let mut body = marketplace_body();
            body.as_object_mut().unwrap().remove(field);
            assert_eq!(
                parse_create_request(&body).unwrap_err(),
                "Missing required fields",
                "field: {field}"
            );
        }
    }

    #[test]
    fn test_create_empty_images_is_rejected() {
        let mut body = marketplace_body();
        body["images"] = json!([]);
        assert_eq!(
            parse_create_request(&body).unwrap_err(),
            "Missing required fields"
        );
    }

    #[test]
    fn test_create_too_many_images_is_rejected() {
        let mut body = marketplace_body();
        body["images"] = json!(["a", "b", "c", "d", "e", "f"]);
        assert_eq!(
            parse_create_request(&body).unwrap_err(),
            "Maximum 5 images allowed"
        );
    }

    #[test]
    fn test_create_marketplace_requires_condition() {
        let mut body = marketplace_body();
        body.as_object_mut().unwrap().remove("condition");
        assert_eq!(
            parse_create_request(&body).unwrap_err(),
            "Condition is required for marketplace items"
        );
    }

    #[test]
    fn test_create_commission_ignores_condition() {
        let body = json!({
            "type": "commission",
            "title": "Custom portrait",
            "description": "Digital, one subject",
            "price": "45",
            "category": "Art",
            "images": ["https://cdn.example.com/p.png"]
        });
        let listing = parse_create_request(&body).unwrap();
        assert_eq!(listing.kind, ListingKind::Commission);
        assert_eq!(listing.condition, None);
        assert!(listing.tags.is_empty());
    }

    #[test]
    fn test_create_price_string_is_coerced() {
        let mut body = marketplace_body();
        body["price"] = json!("19.99");
        assert!(parse_create_request(&body).is_ok());
    }

    #[test]
    fn test_create_negative_price_is_rejected() {
        let mut body = marketplace_body();
        body["price"] = json!(-1);
        assert_eq!(
            parse_create_request(&body).unwrap_err(),
            "price cannot be negative"
        );
    }

    #[test]
    fn test_status_update_commission_requires_strict_boolean() {
        let kind = ListingKind::Commission;
        assert_eq!(
            parse_status_update(kind, &json!({"isAvailable": false})).unwrap(),
            StatusUpdate::Availability(false)
        );
        for bad in [json!({"isAvailable": "true"}), json!({"isAvailable": 1}), json!({})] {
            assert_eq!(
                parse_status_update(kind, &bad).unwrap_err(),
                "isAvailable must be a boolean"
            );
        }
    }

    #[test]
    fn test_status_update_marketplace_accepts_any_non_empty_string() {
        let kind = ListingKind::Marketplace;
        assert_eq!(
            parse_status_update(kind, &json!({"status": "Sold"})).unwrap(),
            StatusUpdate::Status("Sold".to_owned())
        );
        // Free-form by contract: unknown values pass through verbatim.
        assert_eq!(
            parse_status_update(kind, &json!({"status": "On Hold"})).unwrap(),
            StatusUpdate::Status("On Hold".to_owned())
        );
        for bad in [json!({"status": ""}), json!({"status": 3}), json!({})] {
            assert_eq!(
                parse_status_update(kind, &bad).unwrap_err(),
                "status must be a non-empty string"
            );
        }
    }
}
