use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{
    path::Path as ObjectPath, Attribute, AttributeValue, Attributes, GetOptions,
    ObjectStore as ApacheObjectStore, PutOptions, PutPayload,
};

use crate::{
    adapters::outbound::storage::UrlSigner,
    domain::{
        errors::{StoreError, StoreResult},
        models::{AssetKind, BlobMetadata},
        value_objects::{StorageKey, TitleSlug},
    },
    ports::storage::{BlobStat, BlobStore, PutOutcome, SignReadRequest},
};

const META_UPLOADED_BY: &str = "uploaded-by";
const META_ASSET_KIND: &str = "asset-kind";
const META_TITLE_SLUG: &str = "title-slug";

/// Adapter that implements our BlobStore trait using Apache object_store
pub struct ObjectStoreBlobAdapter {
    inner: Arc<dyn ApacheObjectStore>,
    signer: UrlSigner,
}

impl ObjectStoreBlobAdapter {
    pub fn new(store: Arc<dyn ApacheObjectStore>, signer: UrlSigner) -> Self {
        Self {
            inner: store,
            signer,
        }
    }

    fn unavailable(operation: &str, e: object_store::Error) -> StoreError {
        StoreError::Unavailable {
            message: format!("Failed to {}: {}", operation, e),
            source: Some(e.to_string()),
        }
    }
}

#[async_trait]
impl BlobStore for ObjectStoreBlobAdapter {
    async fn put(
        &self,
        key: &StorageKey,
        data: Bytes,
        content_type: &str,
        metadata: &BlobMetadata,
    ) -> StoreResult<PutOutcome> {
        let path = ObjectPath::from(key.as_str());
        let size_bytes = data.len() as u64;
        let payload = PutPayload::from(data);

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        attributes.insert(
            Attribute::Metadata(Cow::Borrowed(META_UPLOADED_BY)),
            AttributeValue::from(metadata.uploaded_by.clone()),
        );
        attributes.insert(
            Attribute::Metadata(Cow::Borrowed(META_ASSET_KIND)),
            AttributeValue::from(metadata.kind.as_str()),
        );
        attributes.insert(
            Attribute::Metadata(Cow::Borrowed(META_TITLE_SLUG)),
            AttributeValue::from(metadata.title_slug.as_str().to_string()),
        );

        let result = self
            .inner
            .put_opts(&path, payload, PutOptions::from(attributes))
            .await
            .map_err(|e| Self::unavailable("put blob", e))?;

        Ok(PutOutcome {
            etag: result.e_tag,
            public_url: self.signer.public_url(key),
            size_bytes,
            content_type: content_type.to_string(),
        })
    }

    async fn stat_by_key(&self, key: &StorageKey) -> StoreResult<Option<BlobStat>> {
        let path = ObjectPath::from(key.as_str());

        let options = GetOptions {
            head: true,
            ..Default::default()
        };

        let result = match self.inner.get_opts(&path, options).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(Self::unavailable("stat blob", e)),
        };

        let meta = &result.meta;
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.as_ref().to_string());

        let uploaded_by = result
            .attributes
            .get(&Attribute::Metadata(Cow::Borrowed(META_UPLOADED_BY)))
            .map(|v| v.as_ref().to_string());
        // Kind comes from the stored metadata, falling back to the key's
        // leading folder
        let kind = result
            .attributes
            .get(&Attribute::Metadata(Cow::Borrowed(META_ASSET_KIND)))
            .and_then(|v| AssetKind::parse(v.as_ref()))
            .or_else(|| AssetKind::from_key_prefix(key.as_str()));
        let slug = result
            .attributes
            .get(&Attribute::Metadata(Cow::Borrowed(META_TITLE_SLUG)))
            .map(|v| v.as_ref().to_string());

        let metadata = kind.map(|kind| {
            BlobMetadata::new(
                uploaded_by.as_deref().unwrap_or_default(),
                kind,
                TitleSlug::from_name(slug.as_deref().unwrap_or_default()),
            )
        });

        Ok(Some(BlobStat {
            key: key.clone(),
            size_bytes: meta.size,
            etag: meta.e_tag.clone(),
            content_type,
            last_modified: meta.last_modified,
            metadata,
        }))
    }

    async fn list_by_prefix(&self, prefix: &str) -> StoreResult<Vec<BlobStat>> {
        let prefix_path = (!prefix.is_empty()).then(|| ObjectPath::from(prefix));

        let mut stream = self.inner.list(prefix_path.as_ref());
        let mut blobs = Vec::new();

        while let Some(result) = futures::StreamExt::next(&mut stream).await {
            let meta = result.map_err(|e| Self::unavailable("list blobs", e))?;

            let key = StorageKey::new(meta.location.to_string()).map_err(|e| {
                StoreError::InvalidKey {
                    message: format!("Invalid key from store: {}", e),
                }
            })?;

            // List results carry no attributes; content type and metadata
            // come from a follow-up stat when a caller needs them
            blobs.push(BlobStat {
                key,
                size_bytes: meta.size,
                etag: meta.e_tag.clone(),
                content_type: None,
                last_modified: meta.last_modified,
                metadata: None,
            });
        }

        Ok(blobs)
    }

    async fn delete(&self, key: &StorageKey) -> StoreResult<bool> {
        let path = ObjectPath::from(key.as_str());

        match self.inner.delete(&path).await {
            Ok(()) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(Self::unavailable("delete blob", e)),
        }
    }

    fn sign_read(&self, request: &SignReadRequest) -> StoreResult<String> {
        self.signer.sign_read(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    fn adapter() -> ObjectStoreBlobAdapter {
        let store = Arc::new(InMemory::new());
        let signer = UrlSigner::new("https://blobs.example.com/catalogos", b"secret".to_vec());
        ObjectStoreBlobAdapter::new(store, signer)
    }

    fn poster_metadata() -> BlobMetadata {
        BlobMetadata::new("ui", AssetKind::Poster, TitleSlug::from_name("Dune"))
    }

    #[tokio::test]
    async fn test_put_and_stat() {
        let adapter = adapter();
        let key = StorageKey::new("posters/dune/1700000000000.jpg".to_string()).unwrap();

        let outcome = adapter
            .put(
                &key,
                Bytes::from_static(b"poster bytes"),
                "image/jpeg",
                &poster_metadata(),
            )
            .await
            .unwrap();
        assert_eq!(outcome.size_bytes, 12);
        assert_eq!(outcome.content_type, "image/jpeg");
        assert_eq!(
            outcome.public_url,
            "https://blobs.example.com/catalogos/posters/dune/1700000000000.jpg"
        );

        let stat = adapter.stat_by_key(&key).await.unwrap().unwrap();
        assert_eq!(stat.size_bytes, 12);
        assert_eq!(stat.content_type.as_deref(), Some("image/jpeg"));
        let metadata = stat.metadata.unwrap();
        assert_eq!(metadata.uploaded_by, "ui");
        assert_eq!(metadata.kind, AssetKind::Poster);
        assert_eq!(metadata.title_slug.as_str(), "dune");
    }

    #[tokio::test]
    async fn test_stat_missing_key() {
        let adapter = adapter();
        let key = StorageKey::new("posters/missing/1.jpg".to_string()).unwrap();

        assert!(adapter.stat_by_key(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let adapter = adapter();
        let key = StorageKey::new("fichas/dune/1.pdf".to_string()).unwrap();

        adapter
            .put(
                &key,
                Bytes::from_static(b"%PDF-"),
                "application/pdf",
                &BlobMetadata::new("ui", AssetKind::TechnicalSheet, TitleSlug::from_name("Dune")),
            )
            .await
            .unwrap();

        assert!(adapter.delete(&key).await.unwrap());
        assert!(!adapter.delete(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_by_prefix() {
        let adapter = adapter();
        let meta = poster_metadata();

        for key in [
            "posters/dune/1.jpg",
            "posters/dune/2.jpg",
            "fichas/dune/1.pdf",
        ] {
            let key = StorageKey::new(key.to_string()).unwrap();
            adapter
                .put(&key, Bytes::from_static(b"x"), "image/jpeg", &meta)
                .await
                .unwrap();
        }

        let posters = adapter.list_by_prefix("posters/dune").await.unwrap();
        assert_eq!(posters.len(), 2);

        let everything = adapter.list_by_prefix("").await.unwrap();
        assert_eq!(everything.len(), 3);
    }
}
