use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    domain::{
        errors::{CatalogError, CatalogResult},
        models::{Asset, BlobMetadata, NewAsset, UploadAssetRequest, UploadReceipt},
        naming,
        policy::{AssetPolicy, VersioningPolicy},
        value_objects::TitleSlug,
    },
    ports::{
        repositories::CatalogRepository, services::AssetService, storage::BlobStore,
        storage::SignReadRequest,
    },
};

/// Implementation of AssetService: validated uploads, per-kind
/// versioning, and signed read access
///
/// The replace sequence for single-active kinds runs inside one unit of
/// work: the prior active asset is found under a per-title lock and
/// deactivated, the blob is stored, the new row is inserted active, and
/// only then does the transaction commit. Any failure before the commit
/// drops the transaction, which rolls the deactivation back and leaves
/// the prior asset untouched.
#[derive(Clone)]
pub struct AssetServiceImpl {
    repository: Arc<dyn CatalogRepository>,
    store: Arc<dyn BlobStore>,
    versioning: VersioningPolicy,
}

impl AssetServiceImpl {
    pub fn new(repository: Arc<dyn CatalogRepository>, store: Arc<dyn BlobStore>) -> Self {
        Self {
            repository,
            store,
            versioning: VersioningPolicy::default(),
        }
    }

    pub fn with_versioning_policy(mut self, versioning: VersioningPolicy) -> Self {
        self.versioning = versioning;
        self
    }

    /// ETag fallback when the backend reports none
    fn calculate_etag(data: &[u8]) -> String {
        format!("{:x}", md5::compute(data))
    }
}

#[async_trait]
impl AssetService for AssetServiceImpl {
    async fn upload_asset(&self, request: UploadAssetRequest) -> CatalogResult<UploadReceipt> {
        let title = self
            .repository
            .get_title(request.title_id)
            .await?
            .ok_or(CatalogError::TitleNotFound {
                id: request.title_id,
            })?;

        let ext = naming::resolve_extension(
            request.filename.as_deref(),
            request.content_type.as_deref(),
            request.kind,
        );
        let content_type = naming::effective_content_type(request.content_type.as_deref(), &ext);

        // Policy check happens before any storage I/O
        AssetPolicy::validate(request.kind, &content_type, request.data.len() as u64)?;

        let key = naming::build_key(
            request.kind,
            &title.name,
            request.filename.as_deref(),
            Some(&content_type),
        );
        let metadata = BlobMetadata::new(
            &request.uploaded_by,
            request.kind,
            TitleSlug::from_name(&title.name),
        );

        // Dropping the transaction on any early return rolls back the
        // deactivation, so a failed upload never leaves the title without
        // an active asset
        let mut tx = self.repository.begin().await?;

        let prior = tx
            .find_active_asset_for_update(title.id, request.kind)
            .await?;
        if self.versioning.single_active(request.kind) {
            if let Some(prior) = &prior {
                tx.deactivate_asset(prior.id).await?;
            }
        }

        let outcome = self
            .store
            .put(&key, request.data.clone(), &content_type, &metadata)
            .await?;

        let record = NewAsset {
            title_id: title.id,
            kind: request.kind,
            storage_key: key.clone(),
            public_url: outcome.public_url,
            etag: outcome
                .etag
                .or_else(|| Some(Self::calculate_etag(&request.data))),
            content_type: outcome.content_type,
            size_bytes: outcome.size_bytes,
            uploaded_by: metadata.uploaded_by.clone(),
        };

        let asset = match tx.insert_asset(&record).await {
            Ok(asset) => asset,
            Err(e) => {
                warn!(
                    key = %record.storage_key,
                    "metadata insert failed after successful put; blob orphaned pending cleanup"
                );
                return Err(e);
            }
        };
        if let Err(e) = tx.commit().await {
            warn!(
                key = %record.storage_key,
                "commit failed after successful put; blob orphaned pending cleanup"
            );
            return Err(e);
        }

        let signed_url = self.store.sign_read(&SignReadRequest {
            key: asset.storage_key.clone(),
            ttl: request.link_ttl,
            inline: request.inline,
            download_filename: Some(asset.storage_key.file_name().to_string()),
        })?;

        info!(
            title_id = %title.id,
            kind = %request.kind,
            key = %asset.storage_key,
            superseded = prior.is_some() && self.versioning.single_active(request.kind),
            "asset uploaded"
        );

        Ok(UploadReceipt { asset, signed_url })
    }

    async fn assets_for_title(&self, title_id: Uuid) -> CatalogResult<Vec<Asset>> {
        if self.repository.get_title(title_id).await?.is_none() {
            return Err(CatalogError::TitleNotFound { id: title_id });
        }
        self.repository.active_assets_for_title(title_id).await
    }

    async fn signed_url(
        &self,
        asset_id: Uuid,
        ttl: Duration,
        inline: bool,
        download_filename: Option<String>,
    ) -> CatalogResult<String> {
        let asset = self
            .repository
            .get_asset(asset_id)
            .await?
            .ok_or(CatalogError::AssetNotFound { id: asset_id })?;

        Ok(self.store.sign_read(&SignReadRequest {
            key: asset.storage_key,
            ttl,
            inline,
            download_filename,
        })?)
    }

    async fn delete_asset(&self, asset_id: Uuid, delete_blob: bool) -> CatalogResult<Asset> {
        let mut tx = self.repository.begin().await?;
        let asset = tx.delete_asset(asset_id).await?;
        tx.commit().await?;

        if delete_blob {
            match self.store.delete(&asset.storage_key).await {
                Ok(removed) => {
                    info!(key = %asset.storage_key, removed, "asset deleted");
                }
                Err(e) => {
                    // Metadata row is already gone; the blob stays behind
                    // for out-of-band cleanup
                    warn!(
                        key = %asset.storage_key,
                        error = %e,
                        "blob delete failed; blob orphaned pending cleanup"
                    );
                }
            }
        }

        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use bytes::Bytes;

    use super::*;
    use crate::{
        adapters::outbound::persistence::InMemoryCatalogRepository,
        domain::{
            errors::{StoreError, StoreResult, ValidationError},
            models::{AssetKind, GenreDraft, TitleDraft, TitleKind},
            value_objects::StorageKey,
        },
        ports::storage::{BlobStat, PutOutcome},
    };

    /// Store double whose puts always fail with a transport error
    struct FailingBlobStore;

    #[async_trait]
    impl BlobStore for FailingBlobStore {
        async fn put(
            &self,
            _key: &StorageKey,
            _data: Bytes,
            _content_type: &str,
            _metadata: &BlobMetadata,
        ) -> StoreResult<PutOutcome> {
            Err(StoreError::Unavailable {
                message: "injected failure".to_string(),
                source: None,
            })
        }

        async fn stat_by_key(&self, _key: &StorageKey) -> StoreResult<Option<BlobStat>> {
            Ok(None)
        }

        async fn list_by_prefix(&self, _prefix: &str) -> StoreResult<Vec<BlobStat>> {
            Ok(Vec::new())
        }

        async fn delete(&self, _key: &StorageKey) -> StoreResult<bool> {
            Ok(false)
        }

        fn sign_read(&self, _request: &SignReadRequest) -> StoreResult<String> {
            Err(StoreError::Unsupported {
                operation: "sign_read".to_string(),
                reason: "failing store".to_string(),
            })
        }
    }

    async fn seeded_repository() -> (Arc<InMemoryCatalogRepository>, Uuid) {
        let repository = Arc::new(InMemoryCatalogRepository::new());

        let mut tx = repository.begin().await.unwrap();
        let genre = tx
            .insert_genre(&GenreDraft {
                name: "Sci-Fi".to_string(),
            })
            .await
            .unwrap();
        let title = tx
            .insert_title(&TitleDraft {
                name: "Dune".to_string(),
                kind: TitleKind::Movie,
                release_year: 2021,
                synopsis: None,
                average_rating: None,
                genres: HashSet::from([genre.id]),
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();

        (repository, title.id)
    }

    fn poster_upload(title_id: Uuid) -> UploadAssetRequest {
        UploadAssetRequest {
            title_id,
            kind: AssetKind::Poster,
            filename: Some("cover.jpg".to_string()),
            content_type: Some("image/jpeg".to_string()),
            data: Bytes::from_static(b"jpeg bytes"),
            uploaded_by: "ui".to_string(),
            link_ttl: Duration::from_secs(1800),
            inline: true,
        }
    }

    async fn seed_active_poster(
        repository: &Arc<InMemoryCatalogRepository>,
        title_id: Uuid,
    ) -> Asset {
        let mut tx = repository.begin().await.unwrap();
        let asset = tx
            .insert_asset(&NewAsset {
                title_id,
                kind: AssetKind::Poster,
                storage_key: StorageKey::new("posters/dune/1.jpg".to_string()).unwrap(),
                public_url: "https://blobs.example.com/posters/dune/1.jpg".to_string(),
                etag: None,
                content_type: "image/jpeg".to_string(),
                size_bytes: 10,
                uploaded_by: "ui".to_string(),
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();
        asset
    }

    #[tokio::test]
    async fn test_failed_upload_leaves_prior_poster_active() {
        let (repository, title_id) = seeded_repository().await;
        let prior = seed_active_poster(&repository, title_id).await;

        let service = AssetServiceImpl::new(repository.clone(), Arc::new(FailingBlobStore));
        let err = service.upload_asset(poster_upload(title_id)).await.unwrap_err();
        assert!(matches!(err, CatalogError::Store(StoreError::Unavailable { .. })));

        // Rollback restored the prior active flag
        let current = repository.get_asset(prior.id).await.unwrap().unwrap();
        assert!(current.active);
    }

    #[tokio::test]
    async fn test_validation_rejects_before_store_call() {
        let (repository, title_id) = seeded_repository().await;

        // A store whose every put fails makes any I/O observable as an
        // Unavailable error; a validation rejection must win instead
        let service = AssetServiceImpl::new(repository, Arc::new(FailingBlobStore));

        let mut request = poster_upload(title_id);
        request.content_type = Some("application/pdf".to_string());
        request.filename = Some("cover.pdf".to_string());
        let err = service.upload_asset(request).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ValidationError::UnsupportedContentType { .. })
        ));

        let mut request = poster_upload(title_id);
        request.data = Bytes::from(vec![0u8; 2 * 1024 * 1024 + 1]);
        let err = service.upload_asset(request).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ValidationError::FileTooLarge { .. })
        ));
    }
}
