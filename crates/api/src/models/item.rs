//! Listing domain types.
//!
//! Two variants share a base shape; they live in parallel tables and never
//! mix. Both serialize with the camelCase field names the clients expect.

use chrono::{DateTime, Utc};
use serde::Serialize;

use quadmarket_core::{AndrewId, ItemCondition, ItemId, ListingKind, Price};

/// A marketplace item: a physical good with a condition and a sale status.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceItem {
    pub id: ItemId,
    pub seller_andrew_id: AndrewId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub tags: Vec<String>,
    /// Ordered image URLs, 1..=5 entries.
    pub images: Vec<String>,
    pub condition: String,
    /// Free-form; conventionally Available/Pending/Sold.
    pub status: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// A commission item: custom work with an availability toggle.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommissionItem {
    pub id: ItemId,
    pub seller_andrew_id: AndrewId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub tags: Vec<String>,
    /// Ordered image URLs, 1..=5 entries.
    pub images: Vec<String>,
    pub is_available: bool,
    /// Estimated days to complete; surfaced in search results.
    pub turnaround_days: Option<i32>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Fully validated input for creating a listing of either kind.
///
/// Built by the creation handler after all field checks pass; constructing
/// one implies the invariants hold (non-empty title/description/category,
/// non-negative price, 1..=5 images, condition present iff marketplace).
#[derive(Debug, Clone)]
pub struct NewListing {
    pub kind: ListingKind,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    /// Required for marketplace items, absent for commissions.
    pub condition: Option<ItemCondition>,
}
