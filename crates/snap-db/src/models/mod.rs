//! Database models - SQLx-compatible structs for PostgreSQL tables

mod account_token;
mod comment;
mod feed;
mod outbox;
mod post;
mod user;

pub use account_token::AccountTokenModel;
pub use comment::CommentModel;
pub use feed::FeedRowModel;
pub use outbox::OutboxModel;
pub use post::{LikeModel, PostModel};
pub use user::UserModel;
