//! User entity - a registered account

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::UserId;

/// Minimum display name length, in characters, after trimming
pub const NAME_MIN_CHARS: usize = 2;

/// User account. The password hash is never part of the entity; repositories
/// hand it out separately for credential checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub verified: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a freshly registered, unverified and inactive user
    pub fn new(name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name,
            email,
            verified: false,
            active: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the account may sign in and use authenticated routes
    #[inline]
    pub fn can_sign_in(&self) -> bool {
        self.verified && self.active
    }

    /// Apply a successful email confirmation
    pub fn mark_verified(&mut self) {
        self.verified = true;
        self.active = true;
        self.updated_at = Utc::now();
    }
}

/// Trim a display name and check its length
pub fn normalize_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.chars().count() < NAME_MIN_CHARS {
        return Err(DomainError::NameTooShort {
            min: NAME_MIN_CHARS,
        });
    }
    Ok(name.to_string())
}
