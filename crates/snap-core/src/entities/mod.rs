//! Domain entities - core business objects

mod account_token;
mod comment;
mod feed;
mod image_key;
mod like;
mod outbox;
mod post;
mod user;

pub use account_token::{AccountToken, TokenEffect, TokenPurpose};
pub use comment::Comment;
pub use feed::{fold_feed, FeedLike, FeedPost, FeedRow};
pub use image_key::object_key;
pub use like::Like;
pub use outbox::{OutboxMessage, OutboxStatus, RetryDecision, RetryPolicy};
pub use post::{
    is_image_content_type, normalize_caption, validate_caption, Post, CAPTION_MAX_CHARS,
    CAPTION_MIN_CHARS,
};
pub use user::{normalize_name, User, NAME_MIN_CHARS};
