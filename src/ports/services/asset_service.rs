use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    errors::CatalogResult,
    models::{Asset, UploadAssetRequest, UploadReceipt},
};

/// Service port for asset upload, versioning, and access
#[async_trait]
pub trait AssetService: Send + Sync + 'static {
    /// Validate, store, and register an uploaded asset.
    ///
    /// For kinds with a single-active policy the prior active asset is
    /// deactivated in the same unit of work that registers the new one;
    /// an upload failure leaves the prior active flag untouched.
    async fn upload_asset(&self, request: UploadAssetRequest) -> CatalogResult<UploadReceipt>;

    /// Active assets for a title, newest first
    async fn assets_for_title(&self, title_id: Uuid) -> CatalogResult<Vec<Asset>>;

    /// Time-limited read URL for an existing asset
    async fn signed_url(
        &self,
        asset_id: Uuid,
        ttl: Duration,
        inline: bool,
        download_filename: Option<String>,
    ) -> CatalogResult<String>;

    /// Hard-delete an asset's metadata row, and its blob when
    /// `delete_blob` is set
    async fn delete_asset(&self, asset_id: Uuid, delete_blob: bool) -> CatalogResult<Asset>;
}
