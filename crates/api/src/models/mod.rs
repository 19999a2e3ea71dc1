//! Domain types for the API.
//!
//! These are validated domain objects, separate from request/response DTO
//! shaping (which lives with the route handlers).

pub mod item;
pub mod user;

pub use item::{CommissionItem, MarketplaceItem, NewListing};
pub use user::{NewUser, OwnProfile, PaymentHandles, ProfileUpdate, PublicProfile, User};
