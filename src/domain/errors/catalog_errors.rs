use uuid::Uuid;

use crate::domain::errors::{StoreError, ValidationError};

/// Errors surfaced by catalog and asset operations
#[derive(Debug, Clone)]
pub enum CatalogError {
    /// Title not found
    TitleNotFound { id: Uuid },

    /// Genre not found
    GenreNotFound { id: Uuid },

    /// Asset not found
    AssetNotFound { id: Uuid },

    /// Genre still referenced by at least one title
    GenreInUse { id: Uuid, referencing_titles: u64 },

    /// Input rejected before reaching the storage layer
    Validation(ValidationError),

    /// Blob store failure during an asset operation
    Store(StoreError),

    /// Relational repository failure
    Repository {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::TitleNotFound { id } => write!(f, "Title not found: {}", id),
            CatalogError::GenreNotFound { id } => write!(f, "Genre not found: {}", id),
            CatalogError::AssetNotFound { id } => write!(f, "Asset not found: {}", id),
            CatalogError::GenreInUse {
                id,
                referencing_titles,
            } => {
                write!(
                    f,
                    "Genre {} is referenced by {} title(s) and cannot be deleted",
                    id, referencing_titles
                )
            }
            CatalogError::Validation(e) => write!(f, "Validation error: {}", e),
            CatalogError::Store(e) => write!(f, "Store error: {}", e),
            CatalogError::Repository { message, .. } => {
                write!(f, "Repository error: {}", message)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<ValidationError> for CatalogError {
    fn from(e: ValidationError) -> Self {
        CatalogError::Validation(e)
    }
}

impl From<StoreError> for CatalogError {
    fn from(e: StoreError) -> Self {
        CatalogError::Store(e)
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
