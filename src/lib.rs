//! Gatehouse Library
//!
//! Session-based authentication demo: login/logout endpoints, a SQLite
//! credential store, and a handful of pages gated behind a login check.
//! Exposed as a library so the binary and the integration tests share the
//! same router construction.

pub mod auth;
pub mod config;
pub mod middleware;
pub mod pages;

pub use auth::api::{router, AppState};
pub use config::Config;
