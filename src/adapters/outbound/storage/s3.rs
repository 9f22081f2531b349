//! S3-compatible store construction via the object_store crate

use std::sync::Arc;

use object_store::{aws::AmazonS3Builder, ObjectStore as ObjectStoreBackend};
use thiserror::Error;

/// Configuration for an S3-compatible storage backend
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub endpoint: Option<String>,
    pub allow_http: bool,
}

/// Errors raised while building a storage backend
#[derive(Debug, Error)]
pub enum StorageSetupError {
    #[error("failed to build S3 store: {0}")]
    Build(#[from] object_store::Error),
}

/// Create an S3 store from configuration
pub fn create_s3_store(config: &S3Config) -> Result<Arc<dyn ObjectStoreBackend>, StorageSetupError> {
    let mut builder = AmazonS3Builder::new()
        .with_bucket_name(&config.bucket)
        .with_region(&config.region);

    if let Some(access_key) = &config.access_key {
        builder = builder.with_access_key_id(access_key);
    }

    if let Some(secret_key) = &config.secret_key {
        builder = builder.with_secret_access_key(secret_key);
    }

    if let Some(endpoint) = &config.endpoint {
        builder = builder.with_endpoint(endpoint);
    }

    if config.allow_http {
        builder = builder.with_allow_http(true);
    }

    let store = builder.build()?;

    Ok(Arc::new(store))
}

/// Create a MinIO store; MinIO speaks the S3 protocol with a custom
/// endpoint and path-style addressing
pub fn create_minio_store(
    endpoint: &str,
    bucket: &str,
    access_key: &str,
    secret_key: &str,
    use_ssl: bool,
) -> Result<Arc<dyn ObjectStoreBackend>, StorageSetupError> {
    let config = S3Config {
        bucket: bucket.to_string(),
        region: "us-east-1".to_string(),
        access_key: Some(access_key.to_string()),
        secret_key: Some(secret_key.to_string()),
        endpoint: Some(endpoint.to_string()),
        allow_http: !use_ssl,
    };
    create_s3_store(&config)
}
