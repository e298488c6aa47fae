//! In-memory blob store

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use snap_core::{BlobStore, PortResult};

/// A stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Keeps objects in a shared map; clones see the same objects
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<DashMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<StoredBlob> {
        self.objects.get(key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> PortResult<String> {
        self.objects.insert(
            key.to_string(),
            StoredBlob {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(key.to_string())
    }

    async fn presigned_get(&self, key: &str) -> PortResult<String> {
        Ok(format!("memory://{key}"))
    }
}
