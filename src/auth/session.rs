//! Session Management
//! Mission: Bind opaque tokens to user identities for a bounded time window

use crate::auth::models::User;
use crate::auth::user_store::CredentialStore;
use anyhow::Result;
use chrono::Utc;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use rusqlite::{params, Connection};
use std::sync::Arc;
use tracing::debug;

/// Token length in alphanumeric characters.
///
/// 64 characters at log2(62) bits each gives ~381 bits of entropy, past the
/// OWASP floor for session identifiers.
const TOKEN_LEN: usize = 64;

/// Server-side session record.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub token: String,
    pub username: String,
    pub created_at: i64,
    pub expires_at: i64,
}

/// Session persistence with SQLite backend.
///
/// Absolute TTL: `expires_at` is fixed at creation and never slides on
/// activity, so logout timing is observable from the moment of login.
pub struct SessionStore {
    db_path: String,
    ttl_secs: i64,
}

impl SessionStore {
    pub fn new(db_path: &str, ttl_secs: i64) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
            ttl_secs,
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                token TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Generate an unguessable session token from the OS entropy source.
    fn generate_token() -> String {
        OsRng
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect()
    }

    /// Create and persist a session for `username`.
    pub fn create(&self, username: &str) -> Result<SessionRecord> {
        let now = Utc::now().timestamp();
        let record = SessionRecord {
            token: Self::generate_token(),
            username: username.to_string(),
            created_at: now,
            expires_at: now + self.ttl_secs,
        };

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO sessions (token, username, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.token,
                record.username,
                record.created_at,
                record.expires_at,
            ],
        )?;

        Ok(record)
    }

    /// Look up a live (non-expired) session; expired rows are dropped on sight.
    pub fn lookup_live(&self, token: &str) -> Result<Option<SessionRecord>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT token, username, created_at, expires_at
             FROM sessions WHERE token = ?1",
        )?;

        let record = stmt.query_row(params![token], |row| {
            Ok(SessionRecord {
                token: row.get(0)?,
                username: row.get(1)?,
                created_at: row.get(2)?,
                expires_at: row.get(3)?,
            })
        });

        let record = match record {
            Ok(record) => record,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if Utc::now().timestamp() >= record.expires_at {
            debug!("Session expired for {}", record.username);
            conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
            return Ok(None);
        }

        Ok(Some(record))
    }

    /// Remove a session. Removing an absent token is not an error.
    pub fn remove(&self, token: &str) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(())
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }
}

/// Session lifecycle orchestrator.
///
/// Resolution re-checks the credential store on every request: a session
/// whose user has vanished is treated as anonymous, never as an error.
pub struct SessionManager {
    store: SessionStore,
    users: Arc<CredentialStore>,
}

impl SessionManager {
    pub fn new(store: SessionStore, users: Arc<CredentialStore>) -> Self {
        Self { store, users }
    }

    /// Establish a fresh session for an authenticated user.
    pub fn establish(&self, user: &User) -> Result<SessionRecord> {
        let record = self.store.create(&user.username)?;
        debug!("Session established for {}", user.username);
        Ok(record)
    }

    /// Resolve a token into the current user identity.
    ///
    /// Absent, expired, or orphaned (user deleted) sessions all resolve to
    /// `Ok(None)`; only store faults surface as errors.
    pub fn resolve(&self, token: &str) -> Result<Option<User>> {
        let record = match self.store.lookup_live(token)? {
            Some(record) => record,
            None => return Ok(None),
        };

        self.users.find_by_username(&record.username)
    }

    /// Destroy a session. Idempotent.
    pub fn destroy(&self, token: &str) -> Result<()> {
        self.store.remove(token)
    }

    pub fn ttl_secs(&self) -> i64 {
        self.store.ttl_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_manager(ttl_secs: i64) -> (SessionManager, Arc<CredentialStore>, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();

        let users = Arc::new(CredentialStore::new(db_path).unwrap());
        users.create_user("paul", "hunter2").unwrap();

        let store = SessionStore::new(db_path, ttl_secs).unwrap();
        let manager = SessionManager::new(store, users.clone());
        (manager, users, temp_file)
    }

    #[test]
    fn test_token_is_long_and_unique() {
        let a = SessionStore::generate_token();
        let b = SessionStore::generate_token();

        assert_eq!(a.len(), TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_round_trip() {
        let (manager, users, _temp) = create_test_manager(60);
        let user = users.find_by_username("paul").unwrap().unwrap();

        let record = manager.establish(&user).unwrap();
        let resolved = manager.resolve(&record.token).unwrap();

        assert_eq!(resolved.unwrap().username, "paul");
    }

    #[test]
    fn test_expired_session_resolves_to_anonymous() {
        // ttl of zero expires the session at the instant it is created
        let (manager, users, _temp) = create_test_manager(0);
        let user = users.find_by_username("paul").unwrap().unwrap();

        let record = manager.establish(&user).unwrap();
        assert!(manager.resolve(&record.token).unwrap().is_none());
    }

    #[test]
    fn test_unknown_token_resolves_to_anonymous() {
        let (manager, _users, _temp) = create_test_manager(60);
        assert!(manager.resolve("not-a-real-token").unwrap().is_none());
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let (manager, users, _temp) = create_test_manager(60);
        let user = users.find_by_username("paul").unwrap().unwrap();

        let record = manager.establish(&user).unwrap();
        manager.destroy(&record.token).unwrap();

        assert!(manager.resolve(&record.token).unwrap().is_none());

        // Second destroy of the same token is fine
        manager.destroy(&record.token).unwrap();
    }

    #[test]
    fn test_orphaned_session_resolves_to_anonymous() {
        let (manager, users, temp) = create_test_manager(60);
        let user = users.find_by_username("paul").unwrap().unwrap();
        let record = manager.establish(&user).unwrap();

        // Delete the user behind the live session
        let conn = Connection::open(temp.path().to_str().unwrap()).unwrap();
        conn.execute("DELETE FROM users WHERE username = 'paul'", [])
            .unwrap();

        assert!(manager.resolve(&record.token).unwrap().is_none());
    }
}
