//! QuadMarket API library.
//!
//! Exposes the API crate's modules for the integration test harness and the
//! CLI; the binary entrypoint lives in `main.rs`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
