//! Listing repository for database operations.
//!
//! The two listing kinds live in parallel tables; each operation is explicit
//! about which table it touches, and the handlers pick based on the request's
//! kind discriminant.

use sqlx::PgPool;

use quadmarket_core::{AndrewId, ItemId, MarketplaceStatus};

use super::RepositoryError;
use crate::models::{CommissionItem, MarketplaceItem, NewListing};

const MARKETPLACE_COLUMNS: &str = "id, seller_andrew_id, title, description, price, category, \
     tags, images, condition, status, created_at";

const COMMISSION_COLUMNS: &str = "id, seller_andrew_id, title, description, price, category, \
     tags, images, is_available, turnaround_days, created_at";

/// Repository for the two listing collections.
pub struct ItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a marketplace listing; initial status is Available.
    ///
    /// The caller guarantees `listing.condition` is present for this kind.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// seller reference that matches no user).
    pub async fn create_marketplace(
        &self,
        seller: &AndrewId,
        listing: &NewListing,
    ) -> Result<ItemId, RepositoryError> {
        let condition = listing
            .condition
            .ok_or_else(|| {
                RepositoryError::DataCorruption("marketplace listing without condition".to_owned())
            })?
            .as_str();

        let id = sqlx::query_scalar::<_, ItemId>(
            "INSERT INTO marketplace_item
                (seller_andrew_id, title, description, price, category, tags, images, condition, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id",
        )
        .bind(seller)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(&listing.category)
        .bind(&listing.tags)
        .bind(&listing.images)
        .bind(condition)
        .bind(MarketplaceStatus::default().as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Insert a commission listing; initially available.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_commission(
        &self,
        seller: &AndrewId,
        listing: &NewListing,
    ) -> Result<ItemId, RepositoryError> {
        let id = sqlx::query_scalar::<_, ItemId>(
            "INSERT INTO commission_item
                (seller_andrew_id, title, description, price, category, tags, images)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(seller)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(&listing.category)
        .bind(&listing.tags)
        .bind(&listing.images)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Load a marketplace item by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn marketplace_by_id(
        &self,
        id: ItemId,
    ) -> Result<Option<MarketplaceItem>, RepositoryError> {
        let item = sqlx::query_as::<_, MarketplaceItem>(&format!(
            "SELECT {MARKETPLACE_COLUMNS} FROM marketplace_item WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// Load a commission item by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn commission_by_id(
        &self,
        id: ItemId,
    ) -> Result<Option<CommissionItem>, RepositoryError> {
        let item = sqlx::query_as::<_, CommissionItem>(&format!(
            "SELECT {COMMISSION_COLUMNS} FROM commission_item WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// All marketplace listings for a seller, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn marketplace_by_seller(
        &self,
        seller: &AndrewId,
    ) -> Result<Vec<MarketplaceItem>, RepositoryError> {
        let items = sqlx::query_as::<_, MarketplaceItem>(&format!(
            "SELECT {MARKETPLACE_COLUMNS} FROM marketplace_item
             WHERE seller_andrew_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(seller)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// All commission listings for a seller, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn commission_by_seller(
        &self,
        seller: &AndrewId,
    ) -> Result<Vec<CommissionItem>, RepositoryError> {
        let items = sqlx::query_as::<_, CommissionItem>(&format!(
            "SELECT {COMMISSION_COLUMNS} FROM commission_item
             WHERE seller_andrew_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(seller)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Overwrite a marketplace item's status string.
    ///
    /// No transition graph: the owner's value is written verbatim.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn set_marketplace_status(
        &self,
        id: ItemId,
        status: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE marketplace_item SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Toggle a commission item's availability.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn set_commission_availability(
        &self,
        id: ItemId,
        is_available: bool,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE commission_item SET is_available = $2 WHERE id = $1")
            .bind(id)
            .bind(is_available)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
