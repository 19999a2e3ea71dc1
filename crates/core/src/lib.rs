//! QuadMarket Core - Shared domain types.
//!
//! This crate provides common types used across all QuadMarket components:
//! - `api` - HTTP JSON API for listings, profiles, favorites, search, uploads
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, handles, emails, prices,
//!   and listing enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
