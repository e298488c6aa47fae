//! # snap-core
//!
//! Domain layer containing entities, typed identifiers, the ownership policy,
//! and the repository and port traits the infrastructure crates implement.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod policy;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    fold_feed, is_image_content_type, normalize_caption, normalize_name, object_key,
    validate_caption, AccountToken, Comment, FeedLike, FeedPost, FeedRow, Like, OutboxMessage,
    OutboxStatus, Post, RetryDecision, RetryPolicy, TokenEffect, TokenPurpose, User,
    CAPTION_MAX_CHARS, CAPTION_MIN_CHARS, NAME_MIN_CHARS,
};
pub use error::DomainError;
pub use policy::{ensure_owner, Capability, Owned};
pub use traits::{
    AccountRepository, BlobStore, FeedRepository, LikeRepository, Notifier, OutboxRepository,
    PortResult, PostRepository, RepoResult, UserRepository,
};
pub use value_objects::{CommentId, IdParseError, LikeId, OutboxId, PostId, TokenId, UserId};
