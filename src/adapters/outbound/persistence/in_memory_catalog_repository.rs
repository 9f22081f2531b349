use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    domain::{
        errors::{CatalogError, CatalogResult, ValidationError},
        models::{Asset, AssetKind, Genre, GenreDraft, NewAsset, Title, TitleDraft, TitleQuery},
    },
    ports::repositories::{CatalogRepository, CatalogTx},
};

/// In-memory implementation of CatalogRepository for testing and development
#[derive(Clone)]
pub struct InMemoryCatalogRepository {
    data: Arc<Mutex<CatalogData>>,
}

#[derive(Default, Clone)]
struct CatalogData {
    titles: HashMap<Uuid, Title>,
    genres: HashMap<Uuid, Genre>,
    assets: HashMap<Uuid, Asset>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(CatalogData::default())),
        }
    }
}

impl Default for InMemoryCatalogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn begin(&self) -> CatalogResult<Box<dyn CatalogTx>> {
        // The store-wide mutex held for the lifetime of the unit of work
        // serializes concurrent replacements; a coarse stand-in for the
        // SQL adapter's per-title row lock
        let guard = self.data.clone().lock_owned().await;
        let snapshot = guard.clone();
        Ok(Box::new(InMemoryCatalogTx {
            guard,
            snapshot,
            committed: false,
        }))
    }

    async fn get_title(&self, id: Uuid) -> CatalogResult<Option<Title>> {
        let data = self.data.lock().await;
        Ok(data.titles.get(&id).cloned())
    }

    async fn list_titles(&self) -> CatalogResult<Vec<Title>> {
        let data = self.data.lock().await;
        let mut titles: Vec<Title> = data.titles.values().cloned().collect();
        titles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(titles)
    }

    async fn search_titles(&self, query: &TitleQuery) -> CatalogResult<Vec<Title>> {
        let data = self.data.lock().await;
        let pattern = query.name_pattern.as_ref().map(|p| p.to_lowercase());

        let mut titles: Vec<Title> = data
            .titles
            .values()
            .filter(|title| {
                if let Some(pattern) = &pattern {
                    if !title.name.to_lowercase().contains(pattern) {
                        return false;
                    }
                }
                if let Some(kind) = query.kind {
                    if title.kind != kind {
                        return false;
                    }
                }
                if let Some(year) = query.year {
                    if title.release_year != year {
                        return false;
                    }
                }
                if let Some(genre_id) = query.genre_id {
                    if !title.genres.contains(&genre_id) {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        titles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(titles)
    }

    async fn get_genre(&self, id: Uuid) -> CatalogResult<Option<Genre>> {
        let data = self.data.lock().await;
        Ok(data.genres.get(&id).cloned())
    }

    async fn find_genre_by_name(&self, name: &str) -> CatalogResult<Option<Genre>> {
        let data = self.data.lock().await;
        Ok(data.genres.values().find(|g| g.name == name).cloned())
    }

    async fn list_genres(&self) -> CatalogResult<Vec<Genre>> {
        let data = self.data.lock().await;
        let mut genres: Vec<Genre> = data.genres.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn count_titles_referencing_genre(&self, genre_id: Uuid) -> CatalogResult<u64> {
        let data = self.data.lock().await;
        Ok(data
            .titles
            .values()
            .filter(|t| t.genres.contains(&genre_id))
            .count() as u64)
    }

    async fn get_asset(&self, id: Uuid) -> CatalogResult<Option<Asset>> {
        let data = self.data.lock().await;
        Ok(data.assets.get(&id).cloned())
    }

    async fn active_assets_for_title(&self, title_id: Uuid) -> CatalogResult<Vec<Asset>> {
        let data = self.data.lock().await;
        let mut assets: Vec<Asset> = data
            .assets
            .values()
            .filter(|a| a.title_id == title_id && a.active)
            .cloned()
            .collect();
        assets.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(assets)
    }
}

struct InMemoryCatalogTx {
    guard: OwnedMutexGuard<CatalogData>,
    snapshot: CatalogData,
    committed: bool,
}

impl InMemoryCatalogTx {
    fn require_genres_exist(&self, draft: &TitleDraft) -> CatalogResult<()> {
        for genre_id in &draft.genres {
            if !self.guard.genres.contains_key(genre_id) {
                return Err(CatalogError::GenreNotFound { id: *genre_id });
            }
        }
        Ok(())
    }
}

impl Drop for InMemoryCatalogTx {
    fn drop(&mut self) {
        // Dropping without commit rolls back, like a SQL transaction
        if !self.committed {
            *self.guard = std::mem::take(&mut self.snapshot);
        }
    }
}

#[async_trait]
impl CatalogTx for InMemoryCatalogTx {
    async fn insert_title(&mut self, draft: &TitleDraft) -> CatalogResult<Title> {
        self.require_genres_exist(draft)?;

        let title = Title {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
            kind: draft.kind,
            release_year: draft.release_year,
            synopsis: draft.synopsis.clone(),
            average_rating: draft.average_rating,
            created_at: Utc::now(),
            genres: draft.genres.clone(),
        };
        self.guard.titles.insert(title.id, title.clone());
        Ok(title)
    }

    async fn update_title(&mut self, id: Uuid, draft: &TitleDraft) -> CatalogResult<Title> {
        self.require_genres_exist(draft)?;

        let existing = self
            .guard
            .titles
            .get_mut(&id)
            .ok_or(CatalogError::TitleNotFound { id })?;
        existing.name = draft.name.clone();
        existing.kind = draft.kind;
        existing.release_year = draft.release_year;
        existing.synopsis = draft.synopsis.clone();
        existing.average_rating = draft.average_rating;
        existing.genres = draft.genres.clone();
        Ok(existing.clone())
    }

    async fn delete_title(&mut self, id: Uuid) -> CatalogResult<Vec<Asset>> {
        if self.guard.titles.remove(&id).is_none() {
            return Err(CatalogError::TitleNotFound { id });
        }

        let cascaded: Vec<Uuid> = self
            .guard
            .assets
            .values()
            .filter(|a| a.title_id == id)
            .map(|a| a.id)
            .collect();
        let mut removed = Vec::with_capacity(cascaded.len());
        for asset_id in cascaded {
            if let Some(asset) = self.guard.assets.remove(&asset_id) {
                removed.push(asset);
            }
        }
        Ok(removed)
    }

    async fn insert_genre(&mut self, draft: &GenreDraft) -> CatalogResult<Genre> {
        if self.guard.genres.values().any(|g| g.name == draft.name) {
            return Err(CatalogError::Validation(ValidationError::DuplicateGenreName(
                draft.name.clone(),
            )));
        }

        let genre = Genre {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
        };
        self.guard.genres.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn update_genre(&mut self, id: Uuid, draft: &GenreDraft) -> CatalogResult<Genre> {
        if self
            .guard
            .genres
            .values()
            .any(|g| g.id != id && g.name == draft.name)
        {
            return Err(CatalogError::Validation(ValidationError::DuplicateGenreName(
                draft.name.clone(),
            )));
        }

        let genre = self
            .guard
            .genres
            .get_mut(&id)
            .ok_or(CatalogError::GenreNotFound { id })?;
        genre.name = draft.name.clone();
        Ok(genre.clone())
    }

    async fn delete_genre(&mut self, id: Uuid) -> CatalogResult<()> {
        let referencing = self
            .guard
            .titles
            .values()
            .filter(|t| t.genres.contains(&id))
            .count() as u64;
        if referencing > 0 {
            return Err(CatalogError::GenreInUse {
                id,
                referencing_titles: referencing,
            });
        }

        self.guard
            .genres
            .remove(&id)
            .ok_or(CatalogError::GenreNotFound { id })?;
        Ok(())
    }

    async fn find_active_asset_for_update(
        &mut self,
        title_id: Uuid,
        kind: AssetKind,
    ) -> CatalogResult<Option<Asset>> {
        if !self.guard.titles.contains_key(&title_id) {
            return Err(CatalogError::TitleNotFound { id: title_id });
        }

        Ok(self
            .guard
            .assets
            .values()
            .find(|a| a.title_id == title_id && a.kind == kind && a.active)
            .cloned())
    }

    async fn deactivate_asset(&mut self, asset_id: Uuid) -> CatalogResult<()> {
        let asset = self
            .guard
            .assets
            .get_mut(&asset_id)
            .ok_or(CatalogError::AssetNotFound { id: asset_id })?;
        asset.active = false;
        Ok(())
    }

    async fn insert_asset(&mut self, record: &NewAsset) -> CatalogResult<Asset> {
        if !self.guard.titles.contains_key(&record.title_id) {
            return Err(CatalogError::TitleNotFound {
                id: record.title_id,
            });
        }

        let asset = Asset {
            id: Uuid::new_v4(),
            title_id: record.title_id,
            kind: record.kind,
            storage_key: record.storage_key.clone(),
            public_url: record.public_url.clone(),
            etag: record.etag.clone(),
            content_type: record.content_type.clone(),
            size_bytes: record.size_bytes,
            uploaded_by: record.uploaded_by.clone(),
            uploaded_at: Utc::now(),
            active: true,
        };
        self.guard.assets.insert(asset.id, asset.clone());
        Ok(asset)
    }

    async fn delete_asset(&mut self, id: Uuid) -> CatalogResult<Asset> {
        self.guard
            .assets
            .remove(&id)
            .ok_or(CatalogError::AssetNotFound { id })
    }

    async fn commit(mut self: Box<Self>) -> CatalogResult<()> {
        self.committed = true;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> CatalogResult<()> {
        // Drop restores the snapshot
        Ok(())
    }
}
