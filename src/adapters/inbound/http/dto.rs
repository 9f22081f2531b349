use axum::{http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    errors::{CatalogError, StoreError},
    models::{Asset, AssetKind, Genre, Title, TitleKind, UploadReceipt},
};

/// DTO for a catalog title
#[derive(Debug, Clone, Serialize)]
pub struct TitleDto {
    pub id: Uuid,
    pub name: String,
    pub kind: TitleKind,
    pub release_year: i32,
    pub synopsis: Option<String>,
    pub average_rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub genre_ids: Vec<Uuid>,
}

impl From<Title> for TitleDto {
    fn from(title: Title) -> Self {
        let mut genre_ids: Vec<Uuid> = title.genres.into_iter().collect();
        genre_ids.sort();
        Self {
            id: title.id,
            name: title.name,
            kind: title.kind,
            release_year: title.release_year,
            synopsis: title.synopsis,
            average_rating: title.average_rating,
            created_at: title.created_at,
            genre_ids,
        }
    }
}

/// DTO for creating or updating a title
#[derive(Debug, Clone, Deserialize)]
pub struct SaveTitleDto {
    pub name: String,
    pub kind: TitleKind,
    pub release_year: i32,
    pub synopsis: Option<String>,
    pub average_rating: Option<f64>,
    pub genre_ids: Vec<Uuid>,
}

/// DTO for a genre
#[derive(Debug, Clone, Serialize)]
pub struct GenreDto {
    pub id: Uuid,
    pub name: String,
}

impl From<Genre> for GenreDto {
    fn from(genre: Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name,
        }
    }
}

/// DTO for creating or renaming a genre
#[derive(Debug, Clone, Deserialize)]
pub struct SaveGenreDto {
    pub name: String,
}

/// DTO for an asset metadata row
#[derive(Debug, Clone, Serialize)]
pub struct AssetDto {
    pub id: Uuid,
    pub title_id: Uuid,
    pub kind: AssetKind,
    pub storage_key: String,
    pub public_url: String,
    pub etag: Option<String>,
    pub content_type: String,
    pub size_bytes: u64,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    pub active: bool,
}

impl From<Asset> for AssetDto {
    fn from(asset: Asset) -> Self {
        Self {
            id: asset.id,
            title_id: asset.title_id,
            kind: asset.kind,
            storage_key: asset.storage_key.as_str().to_string(),
            public_url: asset.public_url,
            etag: asset.etag,
            content_type: asset.content_type,
            size_bytes: asset.size_bytes,
            uploaded_by: asset.uploaded_by,
            uploaded_at: asset.uploaded_at,
            active: asset.active,
        }
    }
}

/// DTO for a completed upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceiptDto {
    pub asset: AssetDto,
    pub signed_url: String,
}

impl From<UploadReceipt> for UploadReceiptDto {
    fn from(receipt: UploadReceipt) -> Self {
        Self {
            asset: receipt.asset.into(),
            signed_url: receipt.signed_url,
        }
    }
}

/// Query parameters for title search; absent parameters are not applied
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchTitlesDto {
    pub name: Option<String>,
    pub kind: Option<TitleKind>,
    pub year: Option<i32>,
    pub genre_id: Option<Uuid>,
}

/// Query parameters for signed URL issuance; `ttl_secs` is required
#[derive(Debug, Clone, Deserialize)]
pub struct SignUrlDto {
    pub ttl_secs: u64,
    pub inline: Option<bool>,
    pub filename: Option<String>,
}

/// DTO for a signed URL response
#[derive(Debug, Clone, Serialize)]
pub struct SignedUrlDto {
    pub url: String,
}

/// Query parameters for asset deletion
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteAssetDto {
    pub delete_blob: Option<bool>,
}

/// DTO for health checks
#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub repository: &'static str,
}

/// DTO for success responses
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponseDto {
    pub message: String,
}

impl SuccessResponseDto {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// DTO for error responses
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponseDto {
    pub error: String,
    pub message: String,
}

impl ErrorResponseDto {
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.to_string(),
        }
    }
}

/// Map a catalog error to its HTTP representation
pub fn error_response(e: CatalogError) -> (StatusCode, Json<ErrorResponseDto>) {
    let (status, error) = match &e {
        CatalogError::TitleNotFound { .. }
        | CatalogError::GenreNotFound { .. }
        | CatalogError::AssetNotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
        CatalogError::GenreInUse { .. } => (StatusCode::CONFLICT, "conflict"),
        CatalogError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
        CatalogError::Store(StoreError::NotFound { .. }) => (StatusCode::NOT_FOUND, "not_found"),
        CatalogError::Store(StoreError::Unavailable { .. }) => {
            (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
        }
        CatalogError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store"),
        CatalogError::Repository { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "repository"),
    };

    (
        status,
        Json(ErrorResponseDto {
            error: error.to_string(),
            message: e.to_string(),
        }),
    )
}
