//! Password Hashing
//! Mission: One-way, salted, work-factor-tunable password storage

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a plaintext password for storage.
///
/// bcrypt generates a fresh random salt per call, so hashing the same
/// plaintext twice yields different stored values.
pub fn hash_password(plaintext: &str) -> Result<String> {
    hash(plaintext, DEFAULT_COST).context("Failed to hash password")
}

/// Verify a plaintext attempt against a stored hash.
///
/// Comparison happens inside bcrypt in constant time.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> Result<bool> {
    verify(plaintext, stored_hash).context("Failed to verify password")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn test_same_plaintext_different_salts() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();

        // Distinct salts, distinct stored values
        assert_ne!(first, second);

        // Both still verify against the original plaintext
        assert!(verify_password("hunter2", &first).unwrap());
        assert!(verify_password("hunter2", &second).unwrap());
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = hash_password("hunter2").unwrap();
        assert!(!hash.contains("hunter2"));
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        // A corrupted stored hash is an infrastructure fault, not a mismatch.
        assert!(verify_password("hunter2", "not-a-bcrypt-hash").is_err());
    }
}
