use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::domain::{errors::StoreResult, models::BlobMetadata, value_objects::StorageKey};

/// Port for blob storage operations
/// This abstracts the actual storage backend (S3, MinIO, in-memory, etc.)
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Store blob bytes with its content type and typed metadata.
    ///
    /// A failed put never leaves a readable partial object behind; that
    /// guarantee is delegated to the backend's atomic put.
    async fn put(
        &self,
        key: &StorageKey,
        data: Bytes,
        content_type: &str,
        metadata: &BlobMetadata,
    ) -> StoreResult<PutOutcome>;

    /// Store-side metadata for a key; `None` when the key does not exist
    async fn stat_by_key(&self, key: &StorageKey) -> StoreResult<Option<BlobStat>>;

    /// List blobs under a prefix, in store-native order
    async fn list_by_prefix(&self, prefix: &str) -> StoreResult<Vec<BlobStat>>;

    /// Delete a blob; returns `false` rather than erroring when nothing
    /// was there, so deletes are idempotent
    async fn delete(&self, key: &StorageKey) -> StoreResult<bool>;

    /// Time-limited, read-only URL for a blob. Local and synchronous once
    /// the signing key is known; expiry is computed from the moment of
    /// generation.
    fn sign_read(&self, request: &SignReadRequest) -> StoreResult<String>;
}

/// What the store reports back after a successful put
#[derive(Debug, Clone)]
pub struct PutOutcome {
    pub etag: Option<String>,
    pub public_url: String,
    pub size_bytes: u64,
    pub content_type: String,
}

/// Store-side view of a blob
#[derive(Debug, Clone)]
pub struct BlobStat {
    pub key: StorageKey,
    pub size_bytes: u64,
    pub etag: Option<String>,
    pub content_type: Option<String>,
    pub last_modified: DateTime<Utc>,
    pub metadata: Option<BlobMetadata>,
}

/// Request for a signed read URL; `ttl` is always caller-supplied
#[derive(Debug, Clone)]
pub struct SignReadRequest {
    pub key: StorageKey,
    pub ttl: Duration,
    /// `inline` renders in the browser, otherwise the URL forces a download
    pub inline: bool,
    pub download_filename: Option<String>,
}
