use crate::domain::models::AssetKind;

/// Validation errors; every variant is rejected before any storage I/O
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    // Asset upload policy errors
    UnsupportedContentType {
        kind: AssetKind,
        content_type: String,
    },
    FileTooLarge {
        size_bytes: u64,
        max_bytes: u64,
    },

    // Title field errors
    TitleNameLength {
        actual: usize,
        min: usize,
        max: usize,
    },
    ReleaseYearOutOfRange {
        year: i32,
        min: i32,
        max: i32,
    },
    FutureReleaseYear {
        year: i32,
        current: i32,
    },
    SynopsisTooLong {
        actual: usize,
        max: usize,
    },
    RatingOutOfRange {
        rating: f64,
    },
    NoGenreAssigned,

    // Genre field errors
    GenreNameLength {
        actual: usize,
        min: usize,
        max: usize,
    },
    DuplicateGenreName(String),

    // StorageKey validation errors
    EmptyStorageKey,
    StorageKeyTooLong {
        actual: usize,
        max: usize,
    },
    InvalidStorageKeyCharacter(char),
    StorageKeyStartsWithSlash,
    StorageKeyContainsDoubleSlash,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::UnsupportedContentType { kind, content_type } => {
                write!(f, "Content type '{}' not allowed for {}", content_type, kind)
            }
            ValidationError::FileTooLarge {
                size_bytes,
                max_bytes,
            } => {
                write!(
                    f,
                    "Invalid file size: {} bytes (must be positive, max: {})",
                    size_bytes, max_bytes
                )
            }

            ValidationError::TitleNameLength { actual, min, max } => {
                write!(
                    f,
                    "Title name length {} out of range ({}..={})",
                    actual, min, max
                )
            }
            ValidationError::ReleaseYearOutOfRange { year, min, max } => {
                write!(f, "Release year {} out of range ({}..={})", year, min, max)
            }
            ValidationError::FutureReleaseYear { year, current } => {
                write!(
                    f,
                    "Release year {} is in the future (current year: {})",
                    year, current
                )
            }
            ValidationError::SynopsisTooLong { actual, max } => {
                write!(f, "Synopsis too long: {} characters (max: {})", actual, max)
            }
            ValidationError::RatingOutOfRange { rating } => {
                write!(f, "Average rating {} out of range (0.0..=10.0)", rating)
            }
            ValidationError::NoGenreAssigned => {
                write!(f, "At least one genre must be assigned")
            }

            ValidationError::GenreNameLength { actual, min, max } => {
                write!(
                    f,
                    "Genre name length {} out of range ({}..={})",
                    actual, min, max
                )
            }
            ValidationError::DuplicateGenreName(name) => {
                write!(f, "A genre named '{}' already exists", name)
            }

            ValidationError::EmptyStorageKey => write!(f, "Storage key cannot be empty"),
            ValidationError::StorageKeyTooLong { actual, max } => {
                write!(f, "Storage key too long: {} bytes (max: {})", actual, max)
            }
            ValidationError::InvalidStorageKeyCharacter(c) => {
                write!(f, "Invalid character in storage key: '{}'", c)
            }
            ValidationError::StorageKeyStartsWithSlash => {
                write!(f, "Storage key cannot start with '/'")
            }
            ValidationError::StorageKeyContainsDoubleSlash => {
                write!(f, "Storage key cannot contain '//'")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
