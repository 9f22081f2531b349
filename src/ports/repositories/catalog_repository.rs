use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    errors::CatalogResult,
    models::{Asset, AssetKind, Genre, GenreDraft, NewAsset, Title, TitleDraft, TitleQuery},
};

/// Repository for the relational catalog (titles, genres, asset metadata)
///
/// Reads go straight to the store so every consistency decision sees fresh
/// state. Mutations happen inside a [`CatalogTx`] unit of work begun here
/// and explicitly committed or rolled back by the caller — never through
/// an ambient transaction.
#[async_trait]
pub trait CatalogRepository: Send + Sync + 'static {
    /// Open a unit of work
    async fn begin(&self) -> CatalogResult<Box<dyn CatalogTx>>;

    async fn get_title(&self, id: Uuid) -> CatalogResult<Option<Title>>;

    /// All titles, newest first
    async fn list_titles(&self) -> CatalogResult<Vec<Title>>;

    /// Filtered titles, newest first; absent filters are not applied
    async fn search_titles(&self, query: &TitleQuery) -> CatalogResult<Vec<Title>>;

    async fn get_genre(&self, id: Uuid) -> CatalogResult<Option<Genre>>;

    /// Case-sensitive exact lookup used for the unique-name rule
    async fn find_genre_by_name(&self, name: &str) -> CatalogResult<Option<Genre>>;

    /// All genres ordered by name
    async fn list_genres(&self) -> CatalogResult<Vec<Genre>>;

    async fn count_titles_referencing_genre(&self, genre_id: Uuid) -> CatalogResult<u64>;

    async fn get_asset(&self, id: Uuid) -> CatalogResult<Option<Asset>>;

    /// Active assets for a title, newest upload first
    async fn active_assets_for_title(&self, title_id: Uuid) -> CatalogResult<Vec<Asset>>;
}

/// Unit of work over the catalog
///
/// Mutations land atomically on `commit`; `rollback` (or dropping the
/// transaction) leaves previously committed state untouched.
#[async_trait]
pub trait CatalogTx: Send {
    /// Insert a title; the repository assigns the id and creation time
    async fn insert_title(&mut self, draft: &TitleDraft) -> CatalogResult<Title>;

    /// Update a title's fields and genre set; `created_at` is immutable
    async fn update_title(&mut self, id: Uuid, draft: &TitleDraft) -> CatalogResult<Title>;

    /// Delete a title, cascading its asset metadata rows; returns the
    /// cascaded assets so the caller can clean up blobs
    async fn delete_title(&mut self, id: Uuid) -> CatalogResult<Vec<Asset>>;

    async fn insert_genre(&mut self, draft: &GenreDraft) -> CatalogResult<Genre>;

    async fn update_genre(&mut self, id: Uuid, draft: &GenreDraft) -> CatalogResult<Genre>;

    async fn delete_genre(&mut self, id: Uuid) -> CatalogResult<()>;

    /// Current active asset of a kind for a title, locked against
    /// concurrent replacement until this unit of work ends
    async fn find_active_asset_for_update(
        &mut self,
        title_id: Uuid,
        kind: AssetKind,
    ) -> CatalogResult<Option<Asset>>;

    async fn deactivate_asset(&mut self, asset_id: Uuid) -> CatalogResult<()>;

    /// Insert an asset as active; the repository assigns the id and
    /// upload time
    async fn insert_asset(&mut self, record: &NewAsset) -> CatalogResult<Asset>;

    /// Hard-delete an asset metadata row; returns the removed record
    async fn delete_asset(&mut self, id: Uuid) -> CatalogResult<Asset>;

    async fn commit(self: Box<Self>) -> CatalogResult<()>;

    async fn rollback(self: Box<Self>) -> CatalogResult<()>;
}
