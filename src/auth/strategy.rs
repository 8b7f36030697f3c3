//! Authentication Strategy
//! Mission: Verify credentials against the store and produce a single outcome

use crate::auth::models::{AuthOutcome, FailureReason};
use crate::auth::password::verify_password;
use crate::auth::user_store::CredentialStore;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Pluggable authentication backend.
///
/// There is a single local username/password implementation today; the trait
/// exists so an alternate backend (e.g. federated identity) can slot in
/// without touching the route layer.
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// Verify a credential pair.
    ///
    /// `Ok(Failure(..))` is the normal rejection path; `Err(..)` is reserved
    /// for infrastructure faults and must never be collapsed into a failure.
    async fn authenticate(&self, username: &str, password: &str) -> Result<AuthOutcome>;
}

/// Local username/password strategy backed by the credential store.
pub struct LocalPasswordStrategy {
    store: Arc<CredentialStore>,
}

impl LocalPasswordStrategy {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthStrategy for LocalPasswordStrategy {
    async fn authenticate(&self, username: &str, password: &str) -> Result<AuthOutcome> {
        let user = match self.store.find_by_username(username)? {
            Some(user) => user,
            None => {
                debug!("Authentication failed: unknown user {}", username);
                return Ok(AuthOutcome::Failure(FailureReason::UnknownUser));
            }
        };

        if !verify_password(password, &user.password_hash)? {
            debug!("Authentication failed: bad credentials for {}", username);
            return Ok(AuthOutcome::Failure(FailureReason::BadCredentials));
        }

        Ok(AuthOutcome::Success(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_strategy() -> (LocalPasswordStrategy, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let store = Arc::new(CredentialStore::new(temp_file.path().to_str().unwrap()).unwrap());
        store.create_user("paul", "hunter2").unwrap();
        (LocalPasswordStrategy::new(store), temp_file)
    }

    #[tokio::test]
    async fn test_correct_credentials_succeed() {
        let (strategy, _temp) = create_test_strategy();

        let outcome = strategy.authenticate("paul", "hunter2").await.unwrap();
        match outcome {
            AuthOutcome::Success(user) => assert_eq!(user.username, "paul"),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wrong_password_is_failure() {
        let (strategy, _temp) = create_test_strategy();

        let outcome = strategy.authenticate("paul", "wrongpass").await.unwrap();
        assert!(matches!(
            outcome,
            AuthOutcome::Failure(FailureReason::BadCredentials)
        ));
    }

    #[tokio::test]
    async fn test_unknown_user_is_failure_not_error() {
        let (strategy, _temp) = create_test_strategy();

        let outcome = strategy.authenticate("nobody", "hunter2").await.unwrap();
        assert!(matches!(
            outcome,
            AuthOutcome::Failure(FailureReason::UnknownUser)
        ));
    }
}
