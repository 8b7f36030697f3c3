//! Middleware for observability.
//!
//! Request logging with latency tracking; the auth guard lives in
//! `auth::guard` since it needs the application state.

pub mod logging;

pub use logging::request_logging;
