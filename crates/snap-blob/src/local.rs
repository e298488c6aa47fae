//! Local filesystem blob store
//!
//! Files land in `root`; the API serves that directory under `/uploads`, so
//! read URLs are plain public links rather than signed ones.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::instrument;

use snap_core::{BlobStore, DomainError, PortResult};

#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: format!("{}/uploads", public_url.trim_end_matches('/')),
        }
    }

    fn path_for(&self, key: &str) -> PortResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(DomainError::BlobStoreError(format!("invalid object key '{key}'")));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, key: &str, _content_type: &str, bytes: Vec<u8>) -> PortResult<String> {
        let path = self.path_for(key)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| DomainError::BlobStoreError(format!("Failed to create upload dir: {e}")))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::BlobStoreError(format!("Failed to write file: {e}")))?;

        Ok(key.to_string())
    }

    async fn presigned_get(&self, key: &str) -> PortResult<String> {
        self.path_for(key)?;
        Ok(format!("{}/{key}", self.base_url))
    }
}
