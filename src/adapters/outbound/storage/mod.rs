// Storage implementations
pub mod object_store_adapter;
pub mod s3;
pub mod url_signer;

// Re-export key types
pub use object_store_adapter::ObjectStoreBlobAdapter;
pub use s3::{create_minio_store, create_s3_store, S3Config};
pub use url_signer::UrlSigner;
