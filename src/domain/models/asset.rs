use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{StorageKey, TitleSlug};

/// Kind of binary asset attached to a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    Poster,
    TechnicalSheet,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Poster => "POSTER",
            AssetKind::TechnicalSheet => "TECHNICAL_SHEET",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "POSTER" => Some(AssetKind::Poster),
            "TECHNICAL_SHEET" => Some(AssetKind::TechnicalSheet),
            _ => None,
        }
    }

    /// Top-level storage folder for this kind
    pub fn folder(&self) -> &'static str {
        match self {
            AssetKind::Poster => "posters",
            AssetKind::TechnicalSheet => "fichas",
        }
    }

    /// Infer the kind from a storage key's leading folder
    pub fn from_key_prefix(key: &str) -> Option<Self> {
        if key.starts_with("posters/") {
            Some(AssetKind::Poster)
        } else if key.starts_with("fichas/") {
            Some(AssetKind::TechnicalSheet)
        } else {
            None
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed metadata attached to every stored blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobMetadata {
    pub uploaded_by: String,
    pub kind: AssetKind,
    pub title_slug: TitleSlug,
}

impl BlobMetadata {
    /// An absent or blank uploader is recorded as "unknown"
    pub fn new(uploaded_by: &str, kind: AssetKind, title_slug: TitleSlug) -> Self {
        let uploaded_by = if uploaded_by.trim().is_empty() {
            "unknown".to_string()
        } else {
            uploaded_by.to_string()
        };
        Self {
            uploaded_by,
            kind,
            title_slug,
        }
    }
}

/// Metadata row for a stored asset
#[derive(Debug, Clone)]
pub struct Asset {
    pub id: Uuid,
    pub title_id: Uuid,
    pub kind: AssetKind,
    pub storage_key: StorageKey,
    pub public_url: String,
    pub etag: Option<String>,
    pub content_type: String,
    pub size_bytes: u64,
    pub uploaded_by: String,
    /// Set once at creation, never updated
    pub uploaded_at: DateTime<Utc>,
    pub active: bool,
}

/// Record for inserting a freshly uploaded asset
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub title_id: Uuid,
    pub kind: AssetKind,
    pub storage_key: StorageKey,
    pub public_url: String,
    pub etag: Option<String>,
    pub content_type: String,
    pub size_bytes: u64,
    pub uploaded_by: String,
}

/// Inputs accepted from the upload-handling collaborator
#[derive(Debug, Clone)]
pub struct UploadAssetRequest {
    pub title_id: Uuid,
    pub kind: AssetKind,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
    pub uploaded_by: String,
    /// Validity window of the signed URL returned with the receipt
    pub link_ttl: Duration,
    pub inline: bool,
}

/// What the caller gets back after a successful upload
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub asset: Asset,
    pub signed_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_folder_and_prefix() {
        assert_eq!(AssetKind::Poster.folder(), "posters");
        assert_eq!(AssetKind::TechnicalSheet.folder(), "fichas");
        assert_eq!(
            AssetKind::from_key_prefix("posters/dune/1.jpg"),
            Some(AssetKind::Poster)
        );
        assert_eq!(
            AssetKind::from_key_prefix("fichas/dune/1.pdf"),
            Some(AssetKind::TechnicalSheet)
        );
        assert_eq!(AssetKind::from_key_prefix("other/dune/1.bin"), None);
    }

    #[test]
    fn test_blob_metadata_unknown_uploader() {
        let slug = TitleSlug::from_name("Dune");
        let meta = BlobMetadata::new("  ", AssetKind::Poster, slug.clone());
        assert_eq!(meta.uploaded_by, "unknown");

        let meta = BlobMetadata::new("ui", AssetKind::Poster, slug);
        assert_eq!(meta.uploaded_by, "ui");
    }
}
