use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, Transaction};
use uuid::Uuid;

use crate::{
    domain::{
        errors::{CatalogError, CatalogResult, ValidationError},
        models::{Asset, AssetKind, Genre, GenreDraft, NewAsset, Title, TitleDraft, TitleQuery},
        value_objects::StorageKey,
    },
    ports::repositories::{CatalogRepository, CatalogTx},
};

/// SQL-based implementation of CatalogRepository using PostgreSQL
#[derive(Clone)]
pub struct SqlCatalogRepository {
    pool: PgPool,
}

const TITLE_COLUMNS: &str = "t.title_id, t.title_name, t.title_kind, t.release_year, \
     t.synopsis, t.average_rating, t.created_at, \
     COALESCE(array_agg(tg.genre_id) FILTER (WHERE tg.genre_id IS NOT NULL), '{}') AS genre_ids";

const ASSET_COLUMNS: &str = "asset_id, title_id, asset_kind, storage_key, public_url, etag, \
     content_type, size_bytes, uploaded_by, uploaded_at, is_active";

impl SqlCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize database tables
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS genres (
                genre_id UUID PRIMARY KEY,
                genre_name VARCHAR(50) NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS titles (
                title_id UUID PRIMARY KEY,
                title_name VARCHAR(150) NOT NULL,
                title_kind VARCHAR(20) NOT NULL,
                release_year INT NOT NULL,
                synopsis VARCHAR(1000),
                average_rating DOUBLE PRECISION,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS title_genres (
                title_id UUID NOT NULL REFERENCES titles(title_id) ON DELETE CASCADE,
                genre_id UUID NOT NULL REFERENCES genres(genre_id),
                PRIMARY KEY (title_id, genre_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS assets (
                asset_id UUID PRIMARY KEY,
                title_id UUID NOT NULL REFERENCES titles(title_id) ON DELETE CASCADE,
                asset_kind VARCHAR(20) NOT NULL,
                storage_key VARCHAR(500) NOT NULL,
                public_url VARCHAR(500) NOT NULL,
                etag VARCHAR(100),
                content_type VARCHAR(50) NOT NULL,
                size_bytes BIGINT NOT NULL,
                uploaded_by VARCHAR(50) NOT NULL,
                uploaded_at TIMESTAMPTZ NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_titles_created_at ON titles(created_at)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_assets_title_kind_active \
             ON assets(title_id, asset_kind) WHERE is_active",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn repo_err(e: sqlx::Error) -> CatalogError {
    CatalogError::Repository {
        message: format!("Database error: {}", e),
        source: Some(e.to_string()),
    }
}

fn row_to_title(row: &PgRow) -> CatalogResult<Title> {
    let kind: String = row.get("title_kind");
    let kind = crate::domain::models::TitleKind::parse(&kind).ok_or_else(|| {
        CatalogError::Repository {
            message: format!("Unknown title kind in database: {}", kind),
            source: None,
        }
    })?;

    let genre_ids: Vec<Uuid> = row.get("genre_ids");

    Ok(Title {
        id: row.get("title_id"),
        name: row.get("title_name"),
        kind,
        release_year: row.get("release_year"),
        synopsis: row.get("synopsis"),
        average_rating: row.get("average_rating"),
        created_at: row.get("created_at"),
        genres: genre_ids.into_iter().collect(),
    })
}

fn row_to_genre(row: &PgRow) -> Genre {
    Genre {
        id: row.get("genre_id"),
        name: row.get("genre_name"),
    }
}

fn row_to_asset(row: &PgRow) -> CatalogResult<Asset> {
    let kind: String = row.get("asset_kind");
    let kind = AssetKind::parse(&kind).ok_or_else(|| CatalogError::Repository {
        message: format!("Unknown asset kind in database: {}", kind),
        source: None,
    })?;

    let storage_key: String = row.get("storage_key");
    let storage_key = StorageKey::new(storage_key).map_err(|e| CatalogError::Repository {
        message: format!("Corrupt storage key in database: {}", e),
        source: None,
    })?;

    Ok(Asset {
        id: row.get("asset_id"),
        title_id: row.get("title_id"),
        kind,
        storage_key,
        public_url: row.get("public_url"),
        etag: row.get("etag"),
        content_type: row.get("content_type"),
        size_bytes: row.get::<i64, _>("size_bytes") as u64,
        uploaded_by: row.get("uploaded_by"),
        uploaded_at: row.get("uploaded_at"),
        active: row.get("is_active"),
    })
}

#[async_trait]
impl CatalogRepository for SqlCatalogRepository {
    async fn begin(&self) -> CatalogResult<Box<dyn CatalogTx>> {
        let tx = self.pool.begin().await.map_err(repo_err)?;
        Ok(Box::new(SqlCatalogTx { tx }))
    }

    async fn get_title(&self, id: Uuid) -> CatalogResult<Option<Title>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM titles t \
             LEFT JOIN title_genres tg ON tg.title_id = t.title_id \
             WHERE t.title_id = $1 GROUP BY t.title_id",
            TITLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(repo_err)?;

        row.as_ref().map(row_to_title).transpose()
    }

    async fn list_titles(&self) -> CatalogResult<Vec<Title>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM titles t \
             LEFT JOIN title_genres tg ON tg.title_id = t.title_id \
             GROUP BY t.title_id ORDER BY t.created_at DESC",
            TITLE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(repo_err)?;

        rows.iter().map(row_to_title).collect()
    }

    async fn search_titles(&self, query: &TitleQuery) -> CatalogResult<Vec<Title>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM titles t \
             LEFT JOIN title_genres tg ON tg.title_id = t.title_id WHERE 1=1",
            TITLE_COLUMNS
        ));

        if let Some(pattern) = &query.name_pattern {
            builder
                .push(" AND t.title_name ILIKE ")
                .push_bind(format!("%{}%", pattern));
        }
        if let Some(kind) = query.kind {
            builder.push(" AND t.title_kind = ").push_bind(kind.as_str());
        }
        if let Some(year) = query.year {
            builder.push(" AND t.release_year = ").push_bind(year);
        }
        if let Some(genre_id) = query.genre_id {
            builder
                .push(
                    " AND EXISTS (SELECT 1 FROM title_genres g \
                     WHERE g.title_id = t.title_id AND g.genre_id = ",
                )
                .push_bind(genre_id)
                .push(")");
        }

        builder.push(" GROUP BY t.title_id ORDER BY t.created_at DESC");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(repo_err)?;

        rows.iter().map(row_to_title).collect()
    }

    async fn get_genre(&self, id: Uuid) -> CatalogResult<Option<Genre>> {
        let row = sqlx::query("SELECT genre_id, genre_name FROM genres WHERE genre_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(repo_err)?;

        Ok(row.as_ref().map(row_to_genre))
    }

    async fn find_genre_by_name(&self, name: &str) -> CatalogResult<Option<Genre>> {
        let row = sqlx::query("SELECT genre_id, genre_name FROM genres WHERE genre_name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(repo_err)?;

        Ok(row.as_ref().map(row_to_genre))
    }

    async fn list_genres(&self) -> CatalogResult<Vec<Genre>> {
        let rows = sqlx::query("SELECT genre_id, genre_name FROM genres ORDER BY genre_name")
            .fetch_all(&self.pool)
            .await
            .map_err(repo_err)?;

        Ok(rows.iter().map(row_to_genre).collect())
    }

    async fn count_titles_referencing_genre(&self, genre_id: Uuid) -> CatalogResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT title_id) FROM title_genres WHERE genre_id = $1",
        )
        .bind(genre_id)
        .fetch_one(&self.pool)
        .await
        .map_err(repo_err)?;

        Ok(count as u64)
    }

    async fn get_asset(&self, id: Uuid) -> CatalogResult<Option<Asset>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM assets WHERE asset_id = $1",
            ASSET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(repo_err)?;

        row.as_ref().map(row_to_asset).transpose()
    }

    async fn active_assets_for_title(&self, title_id: Uuid) -> CatalogResult<Vec<Asset>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM assets WHERE title_id = $1 AND is_active \
             ORDER BY uploaded_at DESC",
            ASSET_COLUMNS
        ))
        .bind(title_id)
        .fetch_all(&self.pool)
        .await
        .map_err(repo_err)?;

        rows.iter().map(row_to_asset).collect()
    }
}

struct SqlCatalogTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CatalogTx for SqlCatalogTx {
    async fn insert_title(&mut self, draft: &TitleDraft) -> CatalogResult<Title> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO titles (title_id, title_name, title_kind, release_year, \
             synopsis, average_rating, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.kind.as_str())
        .bind(draft.release_year)
        .bind(&draft.synopsis)
        .bind(draft.average_rating)
        .bind(created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(repo_err)?;

        for genre_id in &draft.genres {
            sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2)")
                .bind(id)
                .bind(genre_id)
                .execute(&mut *self.tx)
                .await
                .map_err(|e| map_genre_fk(e, *genre_id))?;
        }

        Ok(Title {
            id,
            name: draft.name.clone(),
            kind: draft.kind,
            release_year: draft.release_year,
            synopsis: draft.synopsis.clone(),
            average_rating: draft.average_rating,
            created_at,
            genres: draft.genres.clone(),
        })
    }

    async fn update_title(&mut self, id: Uuid, draft: &TitleDraft) -> CatalogResult<Title> {
        let row = sqlx::query(
            "UPDATE titles SET title_name = $2, title_kind = $3, release_year = $4, \
             synopsis = $5, average_rating = $6 WHERE title_id = $1 RETURNING created_at",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.kind.as_str())
        .bind(draft.release_year)
        .bind(&draft.synopsis)
        .bind(draft.average_rating)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(repo_err)?
        .ok_or(CatalogError::TitleNotFound { id })?;

        sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(repo_err)?;

        for genre_id in &draft.genres {
            sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2)")
                .bind(id)
                .bind(genre_id)
                .execute(&mut *self.tx)
                .await
                .map_err(|e| map_genre_fk(e, *genre_id))?;
        }

        Ok(Title {
            id,
            name: draft.name.clone(),
            kind: draft.kind,
            release_year: draft.release_year,
            synopsis: draft.synopsis.clone(),
            average_rating: draft.average_rating,
            created_at: row.get("created_at"),
            genres: draft.genres.clone(),
        })
    }

    async fn delete_title(&mut self, id: Uuid) -> CatalogResult<Vec<Asset>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM assets WHERE title_id = $1",
            ASSET_COLUMNS
        ))
        .bind(id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(repo_err)?;
        let cascaded: Vec<Asset> = rows
            .iter()
            .map(row_to_asset)
            .collect::<CatalogResult<_>>()?;

        let result = sqlx::query("DELETE FROM titles WHERE title_id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(repo_err)?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::TitleNotFound { id });
        }

        Ok(cascaded)
    }

    async fn insert_genre(&mut self, draft: &GenreDraft) -> CatalogResult<Genre> {
        let id = Uuid::new_v4();

        sqlx::query("INSERT INTO genres (genre_id, genre_name) VALUES ($1, $2)")
            .bind(id)
            .bind(&draft.name)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_genre_unique(e, &draft.name))?;

        Ok(Genre {
            id,
            name: draft.name.clone(),
        })
    }

    async fn update_genre(&mut self, id: Uuid, draft: &GenreDraft) -> CatalogResult<Genre> {
        let result = sqlx::query("UPDATE genres SET genre_name = $2 WHERE genre_id = $1")
            .bind(id)
            .bind(&draft.name)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_genre_unique(e, &draft.name))?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::GenreNotFound { id });
        }

        Ok(Genre {
            id,
            name: draft.name.clone(),
        })
    }

    async fn delete_genre(&mut self, id: Uuid) -> CatalogResult<()> {
        let referencing: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT title_id) FROM title_genres WHERE genre_id = $1")
                .bind(id)
                .fetch_one(&mut *self.tx)
                .await
                .map_err(repo_err)?;
        if referencing > 0 {
            return Err(CatalogError::GenreInUse {
                id,
                referencing_titles: referencing as u64,
            });
        }

        let result = sqlx::query("DELETE FROM genres WHERE genre_id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(repo_err)?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::GenreNotFound { id });
        }

        Ok(())
    }

    async fn find_active_asset_for_update(
        &mut self,
        title_id: Uuid,
        kind: AssetKind,
    ) -> CatalogResult<Option<Asset>> {
        // Lock the owning title row so concurrent replacements for the
        // same title serialize even when no active asset exists yet
        let locked = sqlx::query("SELECT title_id FROM titles WHERE title_id = $1 FOR UPDATE")
            .bind(title_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(repo_err)?;
        if locked.is_none() {
            return Err(CatalogError::TitleNotFound { id: title_id });
        }

        let row = sqlx::query(&format!(
            "SELECT {} FROM assets WHERE title_id = $1 AND asset_kind = $2 AND is_active \
             ORDER BY uploaded_at DESC LIMIT 1",
            ASSET_COLUMNS
        ))
        .bind(title_id)
        .bind(kind.as_str())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(repo_err)?;

        row.as_ref().map(row_to_asset).transpose()
    }

    async fn deactivate_asset(&mut self, asset_id: Uuid) -> CatalogResult<()> {
        let result = sqlx::query("UPDATE assets SET is_active = FALSE WHERE asset_id = $1")
            .bind(asset_id)
            .execute(&mut *self.tx)
            .await
            .map_err(repo_err)?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::AssetNotFound { id: asset_id });
        }

        Ok(())
    }

    async fn insert_asset(&mut self, record: &NewAsset) -> CatalogResult<Asset> {
        let id = Uuid::new_v4();
        let uploaded_at = Utc::now();

        sqlx::query(
            "INSERT INTO assets (asset_id, title_id, asset_kind, storage_key, public_url, \
             etag, content_type, size_bytes, uploaded_by, uploaded_at, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, TRUE)",
        )
        .bind(id)
        .bind(record.title_id)
        .bind(record.kind.as_str())
        .bind(record.storage_key.as_str())
        .bind(&record.public_url)
        .bind(&record.etag)
        .bind(&record.content_type)
        .bind(record.size_bytes as i64)
        .bind(&record.uploaded_by)
        .bind(uploaded_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                CatalogError::TitleNotFound {
                    id: record.title_id,
                }
            } else {
                repo_err(e)
            }
        })?;

        Ok(Asset {
            id,
            title_id: record.title_id,
            kind: record.kind,
            storage_key: record.storage_key.clone(),
            public_url: record.public_url.clone(),
            etag: record.etag.clone(),
            content_type: record.content_type.clone(),
            size_bytes: record.size_bytes,
            uploaded_by: record.uploaded_by.clone(),
            uploaded_at,
            active: true,
        })
    }

    async fn delete_asset(&mut self, id: Uuid) -> CatalogResult<Asset> {
        let row = sqlx::query(&format!(
            "DELETE FROM assets WHERE asset_id = $1 RETURNING {}",
            ASSET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(repo_err)?
        .ok_or(CatalogError::AssetNotFound { id })?;

        row_to_asset(&row)
    }

    async fn commit(self: Box<Self>) -> CatalogResult<()> {
        self.tx.commit().await.map_err(repo_err)
    }

    async fn rollback(self: Box<Self>) -> CatalogResult<()> {
        self.tx.rollback().await.map_err(repo_err)
    }
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
}

fn map_genre_fk(e: sqlx::Error, genre_id: Uuid) -> CatalogError {
    if is_foreign_key_violation(&e) {
        CatalogError::GenreNotFound { id: genre_id }
    } else {
        repo_err(e)
    }
}

fn map_genre_unique(e: sqlx::Error, name: &str) -> CatalogError {
    if e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        CatalogError::Validation(ValidationError::DuplicateGenreName(name.to_string()))
    } else {
        repo_err(e)
    }
}
