//! Ports implemented by the infrastructure crates

mod ports;
mod repositories;

pub use ports::{BlobStore, Notifier, PortResult};
pub use repositories::{
    AccountRepository, FeedRepository, LikeRepository, OutboxRepository, PostRepository,
    RepoResult, UserRepository,
};
