//! # snap-blob
//!
//! [`BlobStore`](snap_core::BlobStore) adapters for uploaded images:
//!
//! - [`S3BlobStore`] for AWS S3 and S3-compatible services (R2, MinIO)
//! - [`LocalBlobStore`] writing under a directory the API serves statically
//! - [`MemoryBlobStore`] for tests and throwaway environments

mod local;
mod memory;
mod s3;

use std::sync::Arc;

use snap_common::{StorageBackend, StorageConfig};
use snap_core::{BlobStore, DomainError};

pub use local::LocalBlobStore;
pub use memory::{MemoryBlobStore, StoredBlob};
pub use s3::S3BlobStore;

/// Build the adapter selected by `config.backend`
///
/// # Errors
/// Returns `BlobStoreError` if the S3 backend is selected without bucket settings
pub async fn from_config(
    config: &StorageConfig,
    public_url: &str,
) -> Result<Arc<dyn BlobStore>, DomainError> {
    let store: Arc<dyn BlobStore> = match config.backend {
        StorageBackend::Local => Arc::new(LocalBlobStore::new(&config.upload_dir, public_url)),
        StorageBackend::Memory => Arc::new(MemoryBlobStore::new()),
        StorageBackend::S3 => {
            let s3 = config.s3.as_ref().ok_or_else(|| {
                DomainError::BlobStoreError("S3 backend selected without S3_BUCKET".to_string())
            })?;
            Arc::new(S3BlobStore::from_config(s3, config.presign_ttl()).await)
        }
    };
    Ok(store)
}
