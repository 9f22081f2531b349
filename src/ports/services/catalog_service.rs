use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    errors::CatalogResult,
    models::{Asset, Genre, GenreDraft, Title, TitleDraft, TitleQuery},
};

/// Service port for title and genre management
#[async_trait]
pub trait CatalogService: Send + Sync + 'static {
    /// Create a title; rejects future release years and empty genre sets
    async fn create_title(&self, draft: TitleDraft) -> CatalogResult<Title>;

    async fn update_title(&self, id: Uuid, draft: TitleDraft) -> CatalogResult<Title>;

    async fn get_title(&self, id: Uuid) -> CatalogResult<Title>;

    /// All titles, newest first
    async fn list_titles(&self) -> CatalogResult<Vec<Title>>;

    /// Filtered titles, newest first
    async fn search_titles(&self, query: TitleQuery) -> CatalogResult<Vec<Title>>;

    /// Delete a title and cascade its asset metadata rows; the returned
    /// assets still have blobs in the store, which remain the caller's
    /// cleanup responsibility
    async fn delete_title(&self, id: Uuid) -> CatalogResult<Vec<Asset>>;

    /// Create a genre; names are unique (case-sensitive)
    async fn create_genre(&self, draft: GenreDraft) -> CatalogResult<Genre>;

    async fn update_genre(&self, id: Uuid, draft: GenreDraft) -> CatalogResult<Genre>;

    async fn get_genre(&self, id: Uuid) -> CatalogResult<Genre>;

    /// All genres ordered by name
    async fn list_genres(&self) -> CatalogResult<Vec<Genre>>;

    /// Delete a genre; fails while any title still references it
    async fn delete_genre(&self, id: Uuid) -> CatalogResult<()>;
}
