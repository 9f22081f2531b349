pub mod repositories;
pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use repositories::{CatalogRepository, CatalogTx};
pub use services::{AssetService, CatalogService};
pub use storage::{BlobStat, BlobStore, PutOutcome, SignReadRequest};
