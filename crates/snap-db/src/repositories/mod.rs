//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in snap-core.
//! Flows that touch several tables run inside one transaction.

mod account;
mod error;
mod feed;
mod like;
mod outbox;
mod post;
mod user;

pub use account::PgAccountRepository;
pub use feed::PgFeedRepository;
pub use like::PgLikeRepository;
pub use outbox::PgOutboxRepository;
pub use post::PgPostRepository;
pub use user::PgUserRepository;
