//! Clients for the managed services this API delegates to.
//!
//! - [`identity`] - the external identity provider (token verification and
//!   canonical user records)
//! - [`search`] - the hosted full-text search service
//! - [`storage`] - managed blob storage for listing images and avatars

pub mod identity;
pub mod search;
pub mod storage;

pub use identity::{IdentityClient, IdentityError, IdentityUser};
pub use search::{SearchClient, SearchError, SearchRequest};
pub use storage::{StorageClient, StorageError};
