//! Authentication Models
//! Mission: Define the user and login data structures shared across the crate

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account as stored in the credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub created_at: String,
}

/// Login request body (JSON or form-encoded).
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Outcome of a single authentication attempt.
///
/// Infrastructure faults (store unavailable, hash corruption) are *not* an
/// outcome: they travel as the `Err` arm of the surrounding `Result` so the
/// caller can tell "wrong password" apart from "store down".
#[derive(Debug)]
pub enum AuthOutcome {
    Success(User),
    Failure(FailureReason),
}

/// Why an authentication attempt was rejected.
///
/// The distinction is logged server-side only; clients see one generic
/// `invalid_credentials` code so the response never reveals whether the
/// username or the password was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    UnknownUser,
    BadCredentials,
}

impl FailureReason {
    /// Structured error code carried on the login redirect.
    pub fn as_code(&self) -> &'static str {
        match self {
            FailureReason::UnknownUser | FailureReason::BadCredentials => "invalid_credentials",
        }
    }
}

/// User response (sanitized)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
        }
    }
}

/// Body of `GET /user`.
#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub user: UserResponse,
}
