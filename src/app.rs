use std::sync::Arc;

use object_store::memory::InMemory;
use sqlx::postgres::PgPoolOptions;

use crate::{
    adapters::{
        inbound::http::AppState,
        outbound::{
            persistence::{InMemoryCatalogRepository, SqlCatalogRepository},
            storage::{
                create_minio_store, create_s3_store, ObjectStoreBlobAdapter, S3Config, UrlSigner,
            },
        },
    },
    domain::policy::VersioningPolicy,
    ports::{repositories::CatalogRepository, storage::BlobStore},
    services::{AssetServiceImpl, CatalogServiceImpl},
};

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    pub repository_backend: RepositoryBackend,
    /// Base URL under which stored blobs are publicly addressed
    pub public_base_url: String,
    /// Secret for signing read URLs
    pub signing_secret: String,
    pub versioning: VersioningPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::InMemory,
            repository_backend: RepositoryBackend::InMemory,
            public_base_url: "http://localhost:9000/catalogos".to_string(),
            signing_secret: "dev-signing-secret".to_string(),
            versioning: VersioningPolicy::default(),
        }
    }
}

/// Storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    S3 {
        bucket: String,
        region: String,
        access_key: Option<String>,
        secret_key: Option<String>,
    },
    MinIO {
        endpoint: String,
        bucket: String,
        access_key: String,
        secret_key: String,
        use_ssl: bool,
    },
}

/// Repository backend configuration
#[derive(Debug, Clone)]
pub enum RepositoryBackend {
    InMemory,
    Database { connection_string: String },
}

/// Application dependencies container
pub struct AppDependencies {
    pub blob_store: Arc<dyn BlobStore>,
    pub catalog_repository: Arc<dyn CatalogRepository>,
}

/// Application services container
pub struct AppServices {
    pub catalog_service: CatalogServiceImpl,
    pub asset_service: AssetServiceImpl,
}

impl AppServices {
    /// HTTP state wrapping the services behind their ports
    pub fn app_state(&self) -> AppState {
        AppState {
            catalog_service: Arc::new(self.catalog_service.clone()),
            asset_service: Arc::new(self.asset_service.clone()),
        }
    }
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    /// Configure repository backend
    pub fn with_repository_backend(mut self, backend: RepositoryBackend) -> Self {
        self.config.repository_backend = backend;
        self
    }

    /// Configure per-kind asset versioning
    pub fn with_versioning_policy(mut self, versioning: VersioningPolicy) -> Self {
        self.config.versioning = versioning;
        self
    }

    /// Build the application dependencies
    pub async fn build_dependencies(&self) -> Result<AppDependencies, AppError> {
        let signer = UrlSigner::new(
            self.config.public_base_url.clone(),
            self.config.signing_secret.clone().into_bytes(),
        );

        let store = match &self.config.storage_backend {
            StorageBackend::InMemory => {
                Arc::new(InMemory::new()) as Arc<dyn object_store::ObjectStore>
            }
            StorageBackend::S3 {
                bucket,
                region,
                access_key,
                secret_key,
            } => create_s3_store(&S3Config {
                bucket: bucket.clone(),
                region: region.clone(),
                access_key: access_key.clone(),
                secret_key: secret_key.clone(),
                endpoint: None,
                allow_http: false,
            })
            .map_err(|e| AppError::StorageInit {
                message: e.to_string(),
            })?,
            StorageBackend::MinIO {
                endpoint,
                bucket,
                access_key,
                secret_key,
                use_ssl,
            } => create_minio_store(endpoint, bucket, access_key, secret_key, *use_ssl).map_err(
                |e| AppError::StorageInit {
                    message: e.to_string(),
                },
            )?,
        };
        let blob_store = Arc::new(ObjectStoreBlobAdapter::new(store, signer));

        let catalog_repository: Arc<dyn CatalogRepository> = match &self.config.repository_backend
        {
            RepositoryBackend::InMemory => Arc::new(InMemoryCatalogRepository::new()),
            RepositoryBackend::Database { connection_string } => {
                let pool = PgPoolOptions::new()
                    .connect(connection_string)
                    .await
                    .map_err(|e| AppError::RepositoryInit {
                        message: format!("Failed to connect: {}", e),
                    })?;
                let repository = SqlCatalogRepository::new(pool);
                repository
                    .migrate()
                    .await
                    .map_err(|e| AppError::RepositoryInit {
                        message: format!("Migration failed: {}", e),
                    })?;
                Arc::new(repository)
            }
        };

        Ok(AppDependencies {
            blob_store,
            catalog_repository,
        })
    }

    /// Build the complete application with services
    pub async fn build(self) -> Result<AppServices, AppError> {
        let deps = self.build_dependencies().await?;

        // Create services with dependency injection
        let catalog_service = CatalogServiceImpl::new(deps.catalog_repository.clone());
        let asset_service =
            AssetServiceImpl::new(deps.catalog_repository.clone(), deps.blob_store.clone())
                .with_versioning_policy(self.config.versioning);

        Ok(AppServices {
            catalog_service,
            asset_service,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },

    #[error("Repository initialization error: {message}")]
    RepositoryInit { message: String },
}

/// Convenience functions for common configurations
///
/// Create an in-memory application for testing and development
pub async fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory)
        .with_repository_backend(RepositoryBackend::InMemory)
        .build()
        .await
}

/// Create a MinIO-backed application
pub async fn create_minio_app(
    endpoint: String,
    bucket: String,
    access_key: String,
    secret_key: String,
    use_ssl: bool,
) -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::MinIO {
            endpoint,
            bucket,
            access_key,
            secret_key,
            use_ssl,
        })
        .build()
        .await
}

/// Create an S3-backed application
pub async fn create_s3_app(
    bucket: String,
    region: String,
    access_key: Option<String>,
    secret_key: Option<String>,
) -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::S3 {
            bucket,
            region,
            access_key,
            secret_key,
        })
        .build()
        .await
}
