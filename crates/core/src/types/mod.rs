//! Domain types for QuadMarket.
//!
//! Every identifier space gets its own newtype so that a seller handle, an
//! identity-provider id, and a listing id can never be cross-assigned.

pub mod email;
pub mod handle;
pub mod id;
pub mod listing;
pub mod price;

pub use email::{Email, EmailError};
pub use handle::{AndrewId, AndrewIdError};
pub use id::{ExternalUserId, ExternalUserIdError, ItemId, UserId};
pub use listing::{ItemCondition, ListingKind, MarketplaceStatus};
pub use price::{Price, PriceError};

/// Sentinel star rating meaning "unrated".
///
/// New profiles start at this value and keep it until the first review.
pub const UNRATED: f32 = -1.0;
