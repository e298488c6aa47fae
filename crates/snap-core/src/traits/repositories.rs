//! Repository traits - the data access the domain needs
//!
//! Multi-row state changes (account creation, token issue and consumption)
//! are single methods so the store can run each one in one transaction.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{AccountToken, FeedRow, Like, OutboxMessage, Post, TokenEffect, User};
use crate::error::DomainError;
use crate::value_objects::{OutboxId, PostId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find user by exact email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>>;
}

// ============================================================================
// Account Repository
// ============================================================================

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a user, its confirmation token and the confirmation email.
    ///
    /// Fails with `EmailAlreadyExists` when the email is taken; nothing is
    /// written in that case.
    async fn create_account(
        &self,
        user: &User,
        password_hash: &str,
        token: &AccountToken,
        email: &OutboxMessage,
    ) -> RepoResult<()>;

    /// Insert a token for an existing user together with its email
    async fn issue_token(&self, token: &AccountToken, email: &OutboxMessage) -> RepoResult<()>;

    /// Consume a token and apply `effect` to its owner.
    ///
    /// Errors: `TokenNotFound`, then `TokenExpired`, then `TokenInvalid`
    /// (inactive or wrong purpose). The row is locked for the duration, so
    /// of two concurrent consumers exactly one succeeds.
    async fn consume_token(
        &self,
        token: &str,
        effect: &TokenEffect,
        now: DateTime<Utc>,
    ) -> RepoResult<UserId>;
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>>;

    /// Create a new post
    async fn create(&self, post: &Post) -> RepoResult<()>;

    /// Replace a post's caption
    async fn update_caption(&self, id: PostId, caption: &str) -> RepoResult<Post>;

    /// Delete a post together with its likes and comments
    async fn delete(&self, id: PostId) -> RepoResult<()>;
}

// ============================================================================
// Like Repository
// ============================================================================

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Check whether the user has liked the post
    async fn exists(&self, post_id: PostId, user_id: UserId) -> RepoResult<bool>;

    /// Create a like; `AlreadyLiked` if the pair exists
    async fn create(&self, like: &Like) -> RepoResult<()>;

    /// Delete a like; returns whether a row was removed
    async fn delete(&self, post_id: PostId, user_id: UserId) -> RepoResult<bool>;
}

// ============================================================================
// Feed Repository
// ============================================================================

#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// All feed rows, newest post first
    async fn list_rows(&self) -> RepoResult<Vec<FeedRow>>;

    /// Feed rows for one post; empty if the post does not exist
    async fn rows_for_post(&self, id: PostId) -> RepoResult<Vec<FeedRow>>;
}

// ============================================================================
// Outbox Repository
// ============================================================================

#[async_trait]
pub trait OutboxRepository: Send + Sync {
    /// Claim up to `limit` due pending messages.
    ///
    /// Claimed messages have their next attempt pushed `lease` into the
    /// future so a concurrent worker does not pick them up again.
    async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: u32,
        lease: Duration,
    ) -> RepoResult<Vec<OutboxMessage>>;

    /// Mark a message delivered
    async fn mark_sent(&self, id: OutboxId, at: DateTime<Utc>) -> RepoResult<()>;

    /// Record a failed attempt and schedule the next one
    async fn reschedule(
        &self,
        id: OutboxId,
        attempts: i32,
        next_attempt_at: DateTime<Utc>,
        error: &str,
    ) -> RepoResult<()>;

    /// Record a failed attempt and stop retrying
    async fn mark_failed(&self, id: OutboxId, attempts: i32, error: &str) -> RepoResult<()>;
}
