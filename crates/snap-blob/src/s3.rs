//! S3-compatible object storage (AWS S3, Cloudflare R2, MinIO)

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::instrument;

use snap_common::S3Config;
use snap_core::{BlobStore, DomainError, PortResult};

/// S3-compatible blob store returning presigned GET URLs
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    presign_ttl: Duration,
}

impl S3BlobStore {
    /// Build a client from bucket settings.
    ///
    /// Explicit keys win; otherwise the default AWS credential chain is used.
    pub async fn from_config(config: &S3Config, presign_ttl: Duration) -> Self {
        let region = Region::new(config.region.clone());

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(region.clone())
            .force_path_style(true);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            builder = builder.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "snap-env",
            ));
        } else {
            let shared = aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .load()
                .await;
            if let Some(provider) = shared.credentials_provider() {
                builder = builder.credentials_provider(provider);
            }
        }

        Self::new(Client::from_conf(builder.build()), &config.bucket, presign_ttl)
    }

    /// Wrap an existing client
    pub fn new(client: Client, bucket: impl Into<String>, presign_ttl: Duration) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            presign_ttl,
        }
    }
}

impl std::fmt::Debug for S3BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3BlobStore")
            .field("bucket", &self.bucket)
            .field("presign_ttl", &self.presign_ttl)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    #[instrument(skip(self, bytes), fields(bucket = %self.bucket, size = bytes.len()))]
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> PortResult<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| DomainError::BlobStoreError(format!("S3 upload failed: {e}")))?;

        Ok(key.to_string())
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn presigned_get(&self, key: &str) -> PortResult<String> {
        let presigning = PresigningConfig::builder()
            .expires_in(self.presign_ttl)
            .build()
            .map_err(|e| DomainError::BlobStoreError(format!("Presigning config error: {e}")))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| DomainError::BlobStoreError(format!("S3 presign failed: {e}")))?;

        Ok(presigned.uri().to_string())
    }
}
