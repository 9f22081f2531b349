use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use http::Method;
use media_catalog_server::{
    create_in_memory_app, AssetKind, AssetService, CatalogError, CatalogService, GenreDraft,
    TitleDraft, TitleKind, UploadAssetRequest, UrlSigner,
};
use uuid::Uuid;

/// Signer matching the in-memory app's default configuration
fn default_signer() -> UrlSigner {
    UrlSigner::new(
        "http://localhost:9000/catalogos",
        b"dev-signing-secret".to_vec(),
    )
}

async fn seed_title(catalog: &impl CatalogService, name: &str) -> Uuid {
    let genre_name = format!("Genre for {}", name);
    let genre = catalog
        .create_genre(GenreDraft { name: genre_name })
        .await
        .unwrap();
    catalog
        .create_title(TitleDraft {
            name: name.to_string(),
            kind: TitleKind::Movie,
            release_year: 2021,
            synopsis: None,
            average_rating: None,
            genres: HashSet::from([genre.id]),
        })
        .await
        .unwrap()
        .id
}

fn poster_upload(title_id: Uuid, data: &'static [u8]) -> UploadAssetRequest {
    UploadAssetRequest {
        title_id,
        kind: AssetKind::Poster,
        filename: Some("cover.JPG".to_string()),
        content_type: Some("image/jpeg".to_string()),
        data: Bytes::from_static(data),
        uploaded_by: "ui".to_string(),
        link_ttl: Duration::from_secs(1800),
        inline: true,
    }
}

fn sheet_upload(title_id: Uuid) -> UploadAssetRequest {
    UploadAssetRequest {
        title_id,
        kind: AssetKind::TechnicalSheet,
        filename: Some("ficha.pdf".to_string()),
        content_type: Some("application/pdf".to_string()),
        data: Bytes::from_static(b"%PDF-1.4"),
        uploaded_by: "ui".to_string(),
        link_ttl: Duration::from_secs(1800),
        inline: false,
    }
}

#[tokio::test]
async fn test_upload_poster_end_to_end() {
    let services = create_in_memory_app().await.unwrap();
    let title_id = seed_title(&services.catalog_service, "Inception 2010!").await;

    let receipt = services
        .asset_service
        .upload_asset(poster_upload(title_id, b"jpeg bytes"))
        .await
        .unwrap();

    let asset = &receipt.asset;
    assert_eq!(asset.kind, AssetKind::Poster);
    assert!(asset.active);
    assert_eq!(asset.content_type, "image/jpeg");
    assert_eq!(asset.size_bytes, 10);
    assert_eq!(asset.uploaded_by, "ui");
    assert!(asset.etag.is_some());

    // Key layout: posters/{slug}/{timestamp}.{ext}
    let key = asset.storage_key.as_str();
    assert!(key.starts_with("posters/inception_2010/"));
    assert!(key.ends_with(".jpg"));

    // The receipt's signed URL grants GET access right now
    let signer = default_signer();
    assert!(signer.verify_read(&receipt.signed_url, &Method::GET, Utc::now()));
    assert!(!signer.verify_read(&receipt.signed_url, &Method::PUT, Utc::now()));
}

#[tokio::test]
async fn test_replace_poster_keeps_single_active() {
    let services = create_in_memory_app().await.unwrap();
    let title_id = seed_title(&services.catalog_service, "Dune").await;

    let first = services
        .asset_service
        .upload_asset(poster_upload(title_id, b"first"))
        .await
        .unwrap();
    let second = services
        .asset_service
        .upload_asset(poster_upload(title_id, b"second"))
        .await
        .unwrap();

    let active = services
        .asset_service
        .assets_for_title(title_id)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, second.asset.id);
    assert_ne!(first.asset.id, second.asset.id);
}

#[tokio::test]
async fn test_technical_sheets_accumulate() {
    let services = create_in_memory_app().await.unwrap();
    let title_id = seed_title(&services.catalog_service, "Dune").await;

    services
        .asset_service
        .upload_asset(sheet_upload(title_id))
        .await
        .unwrap();
    services
        .asset_service
        .upload_asset(sheet_upload(title_id))
        .await
        .unwrap();

    // Sheets are appended without deactivating predecessors
    let active = services
        .asset_service
        .assets_for_title(title_id)
        .await
        .unwrap();
    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|a| a.kind == AssetKind::TechnicalSheet));
}

#[tokio::test]
async fn test_concurrent_poster_replacements_settle_to_one_active() {
    let services = Arc::new(create_in_memory_app().await.unwrap());
    let title_id = seed_title(&services.catalog_service, "Tenet").await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let services = services.clone();
        handles.push(tokio::spawn(async move {
            services
                .asset_service
                .upload_asset(poster_upload(title_id, b"race"))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let active = services
        .asset_service
        .assets_for_title(title_id)
        .await
        .unwrap();
    let active_posters: Vec<_> = active
        .iter()
        .filter(|a| a.kind == AssetKind::Poster)
        .collect();
    assert_eq!(active_posters.len(), 1);
}

#[tokio::test]
async fn test_upload_to_missing_title_fails() {
    let services = create_in_memory_app().await.unwrap();

    let err = services
        .asset_service
        .upload_asset(poster_upload(Uuid::new_v4(), b"bytes"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::TitleNotFound { .. }));
}

#[tokio::test]
async fn test_title_delete_cascades_asset_rows() {
    let services = create_in_memory_app().await.unwrap();
    let title_id = seed_title(&services.catalog_service, "Dune").await;

    services
        .asset_service
        .upload_asset(poster_upload(title_id, b"poster"))
        .await
        .unwrap();
    services
        .asset_service
        .upload_asset(sheet_upload(title_id))
        .await
        .unwrap();

    let cascaded = services
        .catalog_service
        .delete_title(title_id)
        .await
        .unwrap();
    assert_eq!(cascaded.len(), 2);

    let err = services
        .asset_service
        .assets_for_title(title_id)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::TitleNotFound { .. }));
}

#[tokio::test]
async fn test_signed_url_for_existing_asset() {
    let services = create_in_memory_app().await.unwrap();
    let title_id = seed_title(&services.catalog_service, "Dune").await;

    let receipt = services
        .asset_service
        .upload_asset(sheet_upload(title_id))
        .await
        .unwrap();

    let url = services
        .asset_service
        .signed_url(
            receipt.asset.id,
            Duration::from_secs(60),
            false,
            Some("ficha.pdf".to_string()),
        )
        .await
        .unwrap();

    let signer = default_signer();
    let now = Utc::now();
    assert!(signer.verify_read(&url, &Method::GET, now));
    // The URL dies with its ttl
    assert!(!signer.verify_read(&url, &Method::GET, now + chrono::Duration::seconds(120)));

    let err = services
        .asset_service
        .signed_url(Uuid::new_v4(), Duration::from_secs(60), true, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::AssetNotFound { .. }));
}

#[tokio::test]
async fn test_delete_asset_removes_metadata_row() {
    let services = create_in_memory_app().await.unwrap();
    let title_id = seed_title(&services.catalog_service, "Dune").await;

    let receipt = services
        .asset_service
        .upload_asset(poster_upload(title_id, b"poster"))
        .await
        .unwrap();

    services
        .asset_service
        .delete_asset(receipt.asset.id, true)
        .await
        .unwrap();

    let active = services
        .asset_service
        .assets_for_title(title_id)
        .await
        .unwrap();
    assert!(active.is_empty());

    let err = services
        .asset_service
        .delete_asset(receipt.asset.id, false)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::AssetNotFound { .. }));
}
