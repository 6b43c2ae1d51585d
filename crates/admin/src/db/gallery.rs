//! `gallery` persistence.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use garuda_core::{AdminUserId, GalleryCategory, GalleryItemId};

use super::{EntityStore, RepositoryError};
use crate::models::{GalleryFields, GalleryItem};

const COLUMNS: &str = "id, title, description, image_url, category, location, date_taken, \
                       photographer, is_featured, uploaded_by, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct GalleryRow {
    id: GalleryItemId,
    title: String,
    description: Option<String>,
    image_url: String,
    category: GalleryCategory,
    location: Option<String>,
    date_taken: Option<NaiveDate>,
    photographer: Option<String>,
    is_featured: bool,
    uploaded_by: Option<AdminUserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GalleryRow> for GalleryItem {
    fn from(row: GalleryRow) -> Self {
        Self {
            id: row.id,
            fields: GalleryFields {
                title: row.title,
                description: row.description,
                image_url: row.image_url,
                category: row.category,
                location: row.location,
                date_taken: row.date_taken,
                photographer: row.photographer,
                is_featured: row.is_featured,
            },
            uploaded_by: row.uploaded_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `PostgreSQL`-backed gallery store.
#[derive(Debug, Clone)]
pub struct PgGalleryStore {
    pool: PgPool,
}

impl PgGalleryStore {
    /// Create a new gallery store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<GalleryItem> for PgGalleryStore {
    async fn list(&self) -> Result<Vec<GalleryItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, GalleryRow>(&format!(
            "SELECT {COLUMNS} FROM gallery ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: GalleryItemId) -> Result<Option<GalleryItem>, RepositoryError> {
        let row = sqlx::query_as::<_, GalleryRow>(&format!(
            "SELECT {COLUMNS} FROM gallery WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert(
        &self,
        fields: &GalleryFields,
        actor: AdminUserId,
    ) -> Result<GalleryItem, RepositoryError> {
        let row = sqlx::query_as::<_, GalleryRow>(&format!(
            r"
            INSERT INTO gallery (title, description, image_url, category, location,
                                 date_taken, photographer, is_featured, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.image_url)
        .bind(fields.category)
        .bind(&fields.location)
        .bind(fields.date_taken)
        .bind(&fields.photographer)
        .bind(fields.is_featured)
        .bind(actor)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: GalleryItemId,
        fields: &GalleryFields,
    ) -> Result<Option<GalleryItem>, RepositoryError> {
        let row = sqlx::query_as::<_, GalleryRow>(&format!(
            r"
            UPDATE gallery
               SET title = $2, description = $3, image_url = $4, category = $5,
                   location = $6, date_taken = $7, photographer = $8, is_featured = $9,
                   updated_at = NOW()
             WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.image_url)
        .bind(fields.category)
        .bind(&fields.location)
        .bind(fields.date_taken)
        .bind(&fields.photographer)
        .bind(fields.is_featured)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: GalleryItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM gallery WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM gallery")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
