use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use tracing::info;
use uuid::Uuid;

use crate::{
    domain::{
        errors::{CatalogError, CatalogResult, ValidationError},
        models::{Asset, Genre, GenreDraft, Title, TitleDraft, TitleQuery},
    },
    ports::{repositories::CatalogRepository, services::CatalogService},
};

const TITLE_NAME_MIN: usize = 2;
const TITLE_NAME_MAX: usize = 150;
const RELEASE_YEAR_MIN: i32 = 1900;
const RELEASE_YEAR_MAX: i32 = 2100;
const SYNOPSIS_MAX: usize = 1000;
const GENRE_NAME_MIN: usize = 3;
const GENRE_NAME_MAX: usize = 50;

/// Implementation of CatalogService enforcing the catalog's invariants
///
/// Every rule is checked against fresh repository state before a unit of
/// work is opened; a validation failure never reaches the storage layer.
#[derive(Clone)]
pub struct CatalogServiceImpl {
    repository: Arc<dyn CatalogRepository>,
}

impl CatalogServiceImpl {
    pub fn new(repository: Arc<dyn CatalogRepository>) -> Self {
        Self { repository }
    }

    fn validate_title(draft: &TitleDraft) -> Result<(), ValidationError> {
        let name_len = draft.name.trim().chars().count();
        if name_len < TITLE_NAME_MIN || name_len > TITLE_NAME_MAX {
            return Err(ValidationError::TitleNameLength {
                actual: name_len,
                min: TITLE_NAME_MIN,
                max: TITLE_NAME_MAX,
            });
        }

        if !(RELEASE_YEAR_MIN..=RELEASE_YEAR_MAX).contains(&draft.release_year) {
            return Err(ValidationError::ReleaseYearOutOfRange {
                year: draft.release_year,
                min: RELEASE_YEAR_MIN,
                max: RELEASE_YEAR_MAX,
            });
        }

        let current = Utc::now().year();
        if draft.release_year > current {
            return Err(ValidationError::FutureReleaseYear {
                year: draft.release_year,
                current,
            });
        }

        if let Some(synopsis) = &draft.synopsis {
            let len = synopsis.chars().count();
            if len > SYNOPSIS_MAX {
                return Err(ValidationError::SynopsisTooLong {
                    actual: len,
                    max: SYNOPSIS_MAX,
                });
            }
        }

        if let Some(rating) = draft.average_rating {
            if !(0.0..=10.0).contains(&rating) {
                return Err(ValidationError::RatingOutOfRange { rating });
            }
        }

        if draft.genres.is_empty() {
            return Err(ValidationError::NoGenreAssigned);
        }

        Ok(())
    }

    fn validate_genre(draft: &GenreDraft) -> Result<(), ValidationError> {
        let len = draft.name.trim().chars().count();
        if len < GENRE_NAME_MIN || len > GENRE_NAME_MAX {
            return Err(ValidationError::GenreNameLength {
                actual: len,
                min: GENRE_NAME_MIN,
                max: GENRE_NAME_MAX,
            });
        }
        Ok(())
    }

    async fn require_genres_exist(&self, draft: &TitleDraft) -> CatalogResult<()> {
        for genre_id in &draft.genres {
            if self.repository.get_genre(*genre_id).await?.is_none() {
                return Err(CatalogError::GenreNotFound { id: *genre_id });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn create_title(&self, draft: TitleDraft) -> CatalogResult<Title> {
        Self::validate_title(&draft)?;
        self.require_genres_exist(&draft).await?;

        let mut tx = self.repository.begin().await?;
        let title = tx.insert_title(&draft).await?;
        tx.commit().await?;

        info!(title_id = %title.id, name = %title.name, "title created");
        Ok(title)
    }

    async fn update_title(&self, id: Uuid, draft: TitleDraft) -> CatalogResult<Title> {
        Self::validate_title(&draft)?;
        self.require_genres_exist(&draft).await?;

        let mut tx = self.repository.begin().await?;
        let title = tx.update_title(id, &draft).await?;
        tx.commit().await?;

        Ok(title)
    }

    async fn get_title(&self, id: Uuid) -> CatalogResult<Title> {
        self.repository
            .get_title(id)
            .await?
            .ok_or(CatalogError::TitleNotFound { id })
    }

    async fn list_titles(&self) -> CatalogResult<Vec<Title>> {
        self.repository.list_titles().await
    }

    async fn search_titles(&self, query: TitleQuery) -> CatalogResult<Vec<Title>> {
        self.repository.search_titles(&query).await
    }

    async fn delete_title(&self, id: Uuid) -> CatalogResult<Vec<Asset>> {
        let mut tx = self.repository.begin().await?;
        let cascaded = tx.delete_title(id).await?;
        tx.commit().await?;

        info!(
            title_id = %id,
            cascaded_assets = cascaded.len(),
            "title deleted; blobs remain until cleaned up"
        );
        Ok(cascaded)
    }

    async fn create_genre(&self, draft: GenreDraft) -> CatalogResult<Genre> {
        Self::validate_genre(&draft)?;

        if self.repository.find_genre_by_name(&draft.name).await?.is_some() {
            return Err(CatalogError::Validation(ValidationError::DuplicateGenreName(
                draft.name,
            )));
        }

        let mut tx = self.repository.begin().await?;
        let genre = tx.insert_genre(&draft).await?;
        tx.commit().await?;

        info!(genre_id = %genre.id, name = %genre.name, "genre created");
        Ok(genre)
    }

    async fn update_genre(&self, id: Uuid, draft: GenreDraft) -> CatalogResult<Genre> {
        Self::validate_genre(&draft)?;

        if let Some(existing) = self.repository.find_genre_by_name(&draft.name).await? {
            if existing.id != id {
                return Err(CatalogError::Validation(ValidationError::DuplicateGenreName(
                    draft.name,
                )));
            }
        }

        let mut tx = self.repository.begin().await?;
        let genre = tx.update_genre(id, &draft).await?;
        tx.commit().await?;

        Ok(genre)
    }

    async fn get_genre(&self, id: Uuid) -> CatalogResult<Genre> {
        self.repository
            .get_genre(id)
            .await?
            .ok_or(CatalogError::GenreNotFound { id })
    }

    async fn list_genres(&self) -> CatalogResult<Vec<Genre>> {
        self.repository.list_genres().await
    }

    async fn delete_genre(&self, id: Uuid) -> CatalogResult<()> {
        let referencing = self.repository.count_titles_referencing_genre(id).await?;
        if referencing > 0 {
            return Err(CatalogError::GenreInUse {
                id,
                referencing_titles: referencing,
            });
        }

        let mut tx = self.repository.begin().await?;
        tx.delete_genre(id).await?;
        tx.commit().await?;

        info!(genre_id = %id, "genre deleted");
        Ok(())
    }
}
