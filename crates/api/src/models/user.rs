//! User domain types and profile projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quadmarket_core::{AndrewId, Email, ExternalUserId, ItemId, UserId};

/// A user profile (domain type).
///
/// Exactly one exists per external identity; created lazily on the first
/// authenticated sync. The internal [`UserId`] and the [`ExternalUserId`]
/// never appear in API responses.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Internal store-generated id.
    pub id: UserId,
    /// Identity-provider reference. Unique, immutable.
    pub external_id: ExternalUserId,
    /// Handle derived from the email local-part at creation. Immutable.
    pub andrew_id: AndrewId,
    /// Display name.
    pub username: Option<String>,
    pub email: Email,
    pub avatar_url: Option<String>,
    pub shop_banner_url: Option<String>,
    pub shop_title: Option<String>,
    pub shop_description: Option<String>,
    /// `-1` means unrated.
    pub star_rating: f32,
    #[sqlx(flatten)]
    pub payment: PaymentHandles,
    pub created_at: DateTime<Utc>,
}

/// Optional payment handles shown on a shop profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHandles {
    pub paypal_username: Option<String>,
    pub venmo_username: Option<String>,
    pub zelle_username: Option<String>,
    pub cashapp_username: Option<String>,
}

/// Input for creating a profile during identity sync.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub external_id: ExternalUserId,
    pub andrew_id: AndrewId,
    pub username: Option<String>,
    pub email: Email,
    pub avatar_url: Option<String>,
}

/// Allow-listed partial profile update.
///
/// Identity fields (`andrew_id`, `external_id`, email, rating) are not
/// mutable through the profile endpoint; unknown keys in the request body are
/// ignored. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub shop_banner_url: Option<String>,
    pub shop_title: Option<String>,
    pub shop_description: Option<String>,
    pub paypal_username: Option<String>,
    pub venmo_username: Option<String>,
    pub zelle_username: Option<String>,
    pub cashapp_username: Option<String>,
}

impl ProfileUpdate {
    /// True if no field is set; the update endpoint treats this as a no-op.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.avatar_url.is_none()
            && self.shop_banner_url.is_none()
            && self.shop_title.is_none()
            && self.shop_description.is_none()
            && self.paypal_username.is_none()
            && self.venmo_username.is_none()
            && self.zelle_username.is_none()
            && self.cashapp_username.is_none()
    }
}

/// Redacted profile projection for other users.
///
/// Excludes the internal id, the external identity reference, and favorites.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub andrew_id: AndrewId,
    pub username: Option<String>,
    pub email: Email,
    pub avatar_url: Option<String>,
    pub shop_banner_url: Option<String>,
    pub shop_title: Option<String>,
    pub shop_description: Option<String>,
    pub star_rating: f32,
    #[serde(flatten)]
    pub payment: PaymentHandles,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicProfile {
    fn from(user: User) -> Self {
        Self {
            andrew_id: user.andrew_id,
            username: user.username,
            email: user.email,
            avatar_url: user.avatar_url,
            shop_banner_url: user.shop_banner_url,
            shop_title: user.shop_title,
            shop_description: user.shop_description,
            star_rating: user.star_rating,
            payment: user.payment,
            created_at: user.created_at,
        }
    }
}

/// The caller's own profile: the redacted projection plus favorites.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnProfile {
    #[serde(flatten)]
    pub profile: PublicProfile,
    pub favorites: Vec<ItemId>,
}

impl OwnProfile {
    /// Combine a profile with its favorites set.
    #[must_use]
    pub fn new(user: User, favorites: Vec<ItemId>) -> Self {
        Self {
            profile: user.into(),
            favorites,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: UserId::new(7),
            external_id: ExternalUserId::parse("user_2aFgXq9YcDe").unwrap(),
            andrew_id: AndrewId::parse("mmustard3").unwrap(),
            username: Some("Moira".to_owned()),
            email: Email::parse("mmustard3@andrew.cmu.edu").unwrap(),
            avatar_url: Some("https://cdn.example.com/default.png".to_owned()),
            shop_banner_url: None,
            shop_title: None,
            shop_description: None,
            star_rating: quadmarket_core::UNRATED,
            payment: PaymentHandles::default(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_profile_never_exposes_identifiers() {
        let json = serde_json::to_value(PublicProfile::from(sample_user())).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("externalId"));
        assert!(!obj.contains_key("favorites"));
        assert_eq!(obj["andrewId"], "mmustard3");
    }

    #[test]
    fn test_own_profile_includes_favorites_only() {
        let fav = ItemId::generate();
        let json = serde_json::to_value(OwnProfile::new(sample_user(), vec![fav])).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("externalId"));
        assert_eq!(obj["favorites"], serde_json::json!([fav.to_string()]));
    }

    #[test]
    fn test_created_at_serializes_as_epoch_millis() {
        let user = sample_user();
        let millis = user.created_at.timestamp_millis();
        let json = serde_json::to_value(PublicProfile::from(user)).unwrap();
        assert_eq!(json["createdAt"], serde_json::json!(millis));
    }

    #[test]
    fn test_profile_update_ignores_unknown_and_identity_keys() {
        let update: ProfileUpdate = serde_json::from_value(serde_json::json!({
            "username": "New Name",
            "andrewId": "hijacked",
            "starRating": 5,
            "favorites": ["x"]
        }))
        .unwrap();
        assert_eq!(update.username.as_deref(), Some("New Name"));
        assert!(!update.is_empty());
    }

    #[test]
    fn test_profile_update_empty() {
        let update: ProfileUpdate = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(update.is_empty());
    }
}
