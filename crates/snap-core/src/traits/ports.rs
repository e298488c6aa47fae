//! Outbound ports for blob storage and email delivery

use async_trait::async_trait;

use crate::error::DomainError;

/// Result type for port operations
pub type PortResult<T> = Result<T, DomainError>;

/// Object storage for uploaded images
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key` and return the stored reference
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> PortResult<String>;

    /// Time-limited URL for reading `key`
    async fn presigned_get(&self, key: &str) -> PortResult<String>;
}

/// Outbound email
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a plain-text email
    async fn send(&self, to: &str, subject: &str, body: &str) -> PortResult<()>;
}
