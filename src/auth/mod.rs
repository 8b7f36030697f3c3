//! Authentication Module
//! Mission: Session-based login with a SQLite credential store

pub mod api;
pub mod guard;
pub mod models;
pub mod password;
pub mod session;
pub mod strategy;
pub mod user_store;

pub use api::AppState;
pub use guard::require_login;
pub use session::{SessionManager, SessionStore};
pub use strategy::{AuthStrategy, LocalPasswordStrategy};
pub use user_store::CredentialStore;
