//! User repository for database operations.
//!
//! Queries use the runtime sqlx API with `FromRow` domain types; the newtype
//! ids encode and decode through their underlying column types.

use sqlx::PgPool;
use uuid::Uuid;

use quadmarket_core::{AndrewId, ExternalUserId, ItemId, UserId};

use super::RepositoryError;
use crate::models::{NewUser, ProfileUpdate, User};

const USER_COLUMNS: &str = "id, external_id, andrew_id, username, email, avatar_url, \
     shop_banner_url, shop_title, shop_description, star_rating, \
     paypal_username, venmo_username, zelle_username, cashapp_username, created_at";

/// Repository for the user directory and the favorites ledger.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a user by their external identity reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_external_id(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM market_user WHERE external_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Look up a user by handle.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_andrew_id(
        &self,
        andrew_id: &AndrewId,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM market_user WHERE andrew_id = $1"
        ))
        .bind(andrew_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create a profile for a newly synced identity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the external id or handle
    /// already exists, `RepositoryError::Database` for other failures.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO market_user (external_id, andrew_id, username, email, avatar_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.external_id)
        .bind(&new_user.andrew_id)
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.avatar_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("profile already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(user)
    }

    /// Apply an allow-listed partial profile update.
    ///
    /// Unset fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE market_user SET
                username = COALESCE($2, username),
                avatar_url = COALESCE($3, avatar_url),
                shop_banner_url = COALESCE($4, shop_banner_url),
                shop_title = COALESCE($5, shop_title),
                shop_description = COALESCE($6, shop_description),
                paypal_username = COALESCE($7, paypal_username),
                venmo_username = COALESCE($8, venmo_username),
                zelle_username = COALESCE($9, zelle_username),
                cashapp_username = COALESCE($10, cashapp_username)
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(&update.username)
        .bind(&update.avatar_url)
        .bind(&update.shop_banner_url)
        .bind(&update.shop_title)
        .bind(&update.shop_description)
        .bind(&update.paypal_username)
        .bind(&update.venmo_username)
        .bind(&update.zelle_username)
        .bind(&update.cashapp_username)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Fetch the favorites set for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn favorites(&self, user_id: UserId) -> Result<Vec<ItemId>, RepositoryError> {
        let rows = sqlx::query_scalar::<_, Uuid>(
            "SELECT item_id FROM user_favorite WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ItemId::from_uuid).collect())
    }

    /// Add an item to the favorites set.
    ///
    /// Idempotent: adding an already-present id is a no-op success.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add_favorite(
        &self,
        user_id: UserId,
        item_id: ItemId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO user_favorite (user_id, item_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(item_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove an item from the favorites set.
    ///
    /// Idempotent: removing an absent id is a no-op success.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_favorite(
        &self,
        user_id: UserId,
        item_id: ItemId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM user_favorite WHERE user_id = $1 AND item_id = $2")
            .bind(user_id)
            .bind(item_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
