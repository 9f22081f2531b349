pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core business entities and value objects
pub use domain::{
    Asset,
    AssetKind,
    AssetPolicy,
    BlobMetadata,
    // Errors
    CatalogError,
    Genre,
    GenreDraft,
    NewAsset,
    // Value objects
    StorageKey,
    StoreError,
    // Models
    Title,
    TitleDraft,
    TitleKind,
    TitleQuery,
    TitleSlug,
    UploadAssetRequest,
    UploadReceipt,
    ValidationError,
    VersioningPolicy,
};

// Port types - interfaces for external systems
pub use ports::{
    // Service ports
    AssetService,
    BlobStat,
    // Storage ports
    BlobStore,
    // Repository ports
    CatalogRepository,
    CatalogService,
    CatalogTx,
    PutOutcome,
    SignReadRequest,
};

// Service implementations - business logic
pub use services::{AssetServiceImpl, CatalogServiceImpl};

// Application factory and configuration
pub use app::{
    create_in_memory_app, create_minio_app, create_s3_app, AppBuilder, AppConfig, AppDependencies,
    AppError, AppServices, RepositoryBackend, StorageBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{ObjectStoreBlobAdapter, UrlSigner};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_in_memory_app, create_minio_app, create_s3_app, AppBuilder, AppServices, Asset,
        AssetKind, AssetService, BlobStore, CatalogRepository, CatalogService, Genre,
        ObjectStoreBlobAdapter, StorageKey, Title, TitleKind, TitleQuery, UrlSigner,
    };
}
