//! Account tokens - single-use secrets for email confirmation and password reset

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::error::DomainError;
use crate::value_objects::{TokenId, UserId};

/// What a token may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPurpose {
    EmailConfirm,
    PasswordReset,
}

impl TokenPurpose {
    /// Stable storage representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmailConfirm => "email_confirm",
            Self::PasswordReset => "password_reset",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email_confirm" => Some(Self::EmailConfirm),
            "password_reset" => Some(Self::PasswordReset),
            _ => None,
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted token row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountToken {
    pub id: TokenId,
    pub token: String,
    pub user_id: UserId,
    pub purpose: TokenPurpose,
    pub expires_at: DateTime<Utc>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl AccountToken {
    /// Create an active token that expires `ttl` from now
    pub fn new(user_id: UserId, token: String, purpose: TokenPurpose, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: TokenId::new(),
            token,
            user_id,
            purpose,
            expires_at: now + ttl,
            active: true,
            created_at: now,
        }
    }

    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Check whether the token may be consumed for `purpose` at `now`.
    ///
    /// Expiry is reported before the active flag, so a consumed token that has
    /// also expired reports `TokenExpired`.
    pub fn check_consumable(
        &self,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.is_expired_at(now) {
            return Err(DomainError::TokenExpired);
        }
        if !self.active || self.purpose != purpose {
            return Err(DomainError::TokenInvalid);
        }
        Ok(())
    }
}

/// State change applied to the owning user when a token is consumed
#[derive(Clone, PartialEq, Eq)]
pub enum TokenEffect {
    /// Mark the account verified and active
    VerifyAccount,
    /// Replace the password hash
    SetPassword(String),
}

impl TokenEffect {
    /// The token purpose this effect requires
    pub fn purpose(&self) -> TokenPurpose {
        match self {
            Self::VerifyAccount => TokenPurpose::EmailConfirm,
            Self::SetPassword(_) => TokenPurpose::PasswordReset,
        }
    }
}

impl fmt::Debug for TokenEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VerifyAccount => f.write_str("VerifyAccount"),
            Self::SetPassword(_) => f.write_str("SetPassword(<redacted>)"),
        }
    }
}
