//! Process Configuration
//! Mission: Build the process-wide configuration once at startup

use std::env;

/// Explicit configuration for the server, stores, and session cookie.
///
/// Built once from the environment at startup and threaded through the
/// constructors; nothing reads `env::var` after boot.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port (`PORT`, fallback 3000).
    pub port: u16,
    /// SQLite file backing both users and sessions (`AUTH_DB_PATH`).
    pub db_path: String,
    /// Absolute session lifetime in seconds (`SESSION_TTL_SECS`, fallback 60).
    pub session_ttl_secs: i64,
    /// Name of the session cookie (`SESSION_COOKIE`).
    pub cookie_name: String,
    /// `Secure` flag on the session cookie (`COOKIE_SECURE`).
    ///
    /// Defaults to false for plain-HTTP development; must be enabled
    /// whenever transport is encrypted.
    pub cookie_secure: bool,
    /// Seed the demo user on an empty store (`SEED_DEMO_USERS`).
    pub seed_demo_users: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);

        let db_path = env::var("AUTH_DB_PATH").unwrap_or_else(|_| "gatehouse_auth.db".to_string());

        let session_ttl_secs = env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(60);

        let cookie_name = env::var("SESSION_COOKIE").unwrap_or_else(|_| "gatehouse_sid".to_string());

        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "on" | "ON"))
            .unwrap_or(false);

        let seed_demo_users = env::var("SEED_DEMO_USERS")
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "on" | "ON"))
            .unwrap_or(true);

        Self {
            port,
            db_path,
            session_ttl_secs,
            cookie_name,
            cookie_secure,
            seed_demo_users,
        }
    }
}

impl Default for Config {
    /// Development defaults, shared by tests.
    fn default() -> Self {
        Self {
            port: 3000,
            db_path: "gatehouse_auth.db".to_string(),
            session_ttl_secs: 60,
            cookie_name: "gatehouse_sid".to_string(),
            cookie_secure: false,
            seed_demo_users: true,
        }
    }
}
