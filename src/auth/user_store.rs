//! Credential Storage
//! Mission: Securely store and look up user accounts with SQLite

use crate::auth::models::User;
use crate::auth::password::hash_password;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{info, warn};
use uuid::Uuid;

/// Credential store with SQLite backend.
///
/// Connections are opened per call; username uniqueness is enforced by the
/// database, not by application-level locking, so concurrent `create_user`
/// calls for the same name resolve at the `UNIQUE` constraint.
pub struct CredentialStore {
    db_path: String,
}

/// Registration-time error, split so callers can tell a duplicate username
/// apart from an unavailable store.
#[derive(Debug)]
pub enum CreateUserError {
    DuplicateUsername,
    Store(anyhow::Error),
}

impl std::fmt::Display for CreateUserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateUserError::DuplicateUsername => write!(f, "Username already exists"),
            CreateUserError::Store(e) => write!(f, "Credential store error: {}", e),
        }
    }
}

impl std::error::Error for CreateUserError {}

impl CredentialStore {
    /// Create a new credential store and initialize the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Get user by username.
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, username, password_hash, created_at
             FROM users WHERE username = ?1",
        )?;

        let user_result = stmt.query_row(params![username], |row| {
            let id: String = row.get(0)?;
            Ok(User {
                id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::nil()),
                username: row.get(1)?,
                password_hash: row.get(2)?,
                created_at: row.get(3)?,
            })
        });

        match user_result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create a new user from a plaintext password.
    pub fn create_user(&self, username: &str, password: &str) -> Result<User, CreateUserError> {
        let password_hash = hash_password(password).map_err(CreateUserError::Store)?;

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = Connection::open(&self.db_path)
            .context("Failed to open credential store")
            .map_err(CreateUserError::Store)?;

        let inserted = conn.execute(
            "INSERT INTO users (id, username, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user.id.to_string(),
                user.username,
                user.password_hash,
                user.created_at,
            ],
        );

        match inserted {
            Ok(_) => {
                info!("✅ Created user: {}", user.username);
                Ok(user)
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(CreateUserError::DuplicateUsername)
            }
            Err(e) => Err(CreateUserError::Store(e.into())),
        }
    }

    /// Seed a demo user if it does not exist yet (dev convenience).
    pub fn seed_user(&self, username: &str, password: &str) -> Result<()> {
        if self.find_by_username(username)?.is_some() {
            return Ok(());
        }

        match self.create_user(username, password) {
            Ok(_) => {
                info!("🔐 Seeded demo user: {} (password: {})", username, password);
                warn!("⚠️  REMOVE SEEDED USERS IN PRODUCTION!");
                Ok(())
            }
            // Concurrent seeding lost the race; the user exists, which is the goal.
            Err(CreateUserError::DuplicateUsername) => Ok(()),
            Err(CreateUserError::Store(e)) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (CredentialStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();
        let store = CredentialStore::new(db_path).unwrap();
        (store, temp_file)
    }

    #[test]
    fn test_create_and_retrieve_user() {
        let (store, _temp) = create_test_store();

        let created = store.create_user("paul", "hunter2").unwrap();
        assert_eq!(created.username, "paul");

        let retrieved = store.find_by_username("paul").unwrap();
        assert!(retrieved.is_some());

        let retrieved = retrieved.unwrap();
        assert_eq!(retrieved.username, "paul");
        assert_eq!(retrieved.id, created.id);
        assert!(verify_password("hunter2", &retrieved.password_hash).unwrap());
    }

    #[test]
    fn test_unknown_username_is_none_not_error() {
        let (store, _temp) = create_test_store();
        assert!(store.find_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (store, _temp) = create_test_store();

        store.create_user("paul", "hunter2").unwrap();
        let second = store.create_user("paul", "different");

        assert!(matches!(second, Err(CreateUserError::DuplicateUsername)));
    }

    #[test]
    fn test_seed_user_is_idempotent() {
        let (store, _temp) = create_test_store();

        store.seed_user("paul", "hunter2").unwrap();
        store.seed_user("paul", "hunter2").unwrap();

        let user = store.find_by_username("paul").unwrap().unwrap();
        assert!(verify_password("hunter2", &user.password_hash).unwrap());
    }
}
