use crate::domain::value_objects::StorageKey;

/// Errors that can occur against the blob store
#[derive(Debug, Clone)]
pub enum StoreError {
    /// Blob not found
    NotFound { key: StorageKey },

    /// Key rejected by the backend
    InvalidKey { message: String },

    /// Transport or auth failure; retryable by the caller, never
    /// partially committed here
    Unavailable {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },

    /// Operation the configured backend cannot perform
    Unsupported { operation: String, reason: String },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound { key } => {
                write!(f, "Blob not found: {}", key)
            }
            StoreError::InvalidKey { message } => {
                write!(f, "Invalid storage key: {}", message)
            }
            StoreError::Unavailable { message, .. } => {
                write!(f, "Blob store unavailable: {}", message)
            }
            StoreError::Unsupported { operation, reason } => {
                write!(f, "Operation '{}' not supported: {}", operation, reason)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Result type for blob store operations
pub type StoreResult<T> = Result<T, StoreError>;
