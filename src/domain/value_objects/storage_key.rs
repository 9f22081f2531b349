use crate::domain::errors::ValidationError;

/// A validated key (path) in the blob store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Create a new StorageKey with validation
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyStorageKey);
        }

        if value.len() > 500 {
            return Err(ValidationError::StorageKeyTooLong {
                actual: value.len(),
                max: 500,
            });
        }

        if value.contains('\0') {
            return Err(ValidationError::InvalidStorageKeyCharacter('\0'));
        }

        if value.starts_with('/') {
            return Err(ValidationError::StorageKeyStartsWithSlash);
        }

        if value.contains("//") {
            return Err(ValidationError::StorageKeyContainsDoubleSlash);
        }

        Ok(Self(value))
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the file name part of the key (everything after the last '/')
    pub fn file_name(&self) -> &str {
        self.0.rfind('/').map_or(&self.0, |idx| &self.0[idx + 1..])
    }

    /// Check if this key has the given prefix
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_storage_key() {
        assert!(StorageKey::new("posters/dune/1700000000000.jpg".to_string()).is_ok());
        assert!(StorageKey::new("fichas/dune/1700000000000.pdf".to_string()).is_ok());
        assert!(StorageKey::new("file.txt".to_string()).is_ok());
    }

    #[test]
    fn test_invalid_storage_key() {
        assert!(StorageKey::new("".to_string()).is_err());
        assert!(StorageKey::new("/leading-slash".to_string()).is_err());
        assert!(StorageKey::new("double//slash".to_string()).is_err());
        assert!(StorageKey::new("null\0byte".to_string()).is_err());
        assert!(StorageKey::new("x".repeat(501)).is_err());
    }

    #[test]
    fn test_storage_key_parts() {
        let key = StorageKey::new("posters/dune/1700000000000.jpg".to_string()).unwrap();
        assert_eq!(key.file_name(), "1700000000000.jpg");
        assert!(key.has_prefix("posters/"));
        assert!(!key.has_prefix("fichas/"));
    }
}
