//! Password hashing and verification
//!
//! Argon2id with library defaults; comparisons go through the verifier, never
//! through string equality.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a hash
///
/// # Errors
/// Returns an error if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash compared against when the account does not exist, so an unknown
/// email costs the same as a wrong password
fn decoy_hash() -> Option<&'static str> {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();
    DECOY
        .get_or_init(|| hash_password("decoy-password").ok())
        .as_deref()
}

/// Password hashing off the async executor
#[derive(Debug, Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    /// Create a new password service
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash a password on the blocking pool
    ///
    /// # Errors
    /// Returns an error if hashing fails
    pub async fn hash(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Hashing task failed: {e}")))?
    }

    /// Check a login attempt.
    ///
    /// `stored` is `None` when no account matched; the password is then checked
    /// against a decoy hash and the result is always `false`.
    ///
    /// # Errors
    /// Returns an error if the stored hash is malformed
    pub async fn check(&self, password: &str, stored: Option<String>) -> Result<bool, AppError> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || match stored {
            Some(hash) => verify_password(&password, &hash),
            None => {
                if let Some(decoy) = decoy_hash() {
                    let _ = verify_password(&password, decoy);
                }
                Ok(false)
            }
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Verification task failed: {e}")))?
    }
}
