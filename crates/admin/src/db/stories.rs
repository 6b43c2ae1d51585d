//! `stories` persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use garuda_core::{AdminUserId, StoryCategory, StoryId, StoryStatus};

use super::{EntityStore, RepositoryError};
use crate::models::{Story, StoryFields};

const COLUMNS: &str = "id, title, content, excerpt, category, featured_image_url, status, \
                       author_name, author_role, read_time_minutes, is_featured, \
                       published_at, created_by, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct StoryRow {
    id: StoryId,
    title: String,
    content: String,
    excerpt: Option<String>,
    category: StoryCategory,
    featured_image_url: Option<String>,
    status: StoryStatus,
    author_name: Option<String>,
    author_role: Option<String>,
    read_time_minutes: i32,
    is_featured: bool,
    published_at: Option<DateTime<Utc>>,
    created_by: Option<AdminUserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoryRow> for Story {
    fn from(row: StoryRow) -> Self {
        Self {
            id: row.id,
            fields: StoryFields {
                title: row.title,
                content: row.content,
                excerpt: row.excerpt,
                category: row.category,
                featured_image_url: row.featured_image_url,
                status: row.status,
                author_name: row.author_name,
                author_role: row.author_role,
                read_time_minutes: row.read_time_minutes,
                is_featured: row.is_featured,
            },
            published_at: row.published_at,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `PostgreSQL`-backed story store.
///
/// `published_at` follows the same rule as
/// [`crate::models::story::published_at_after`], evaluated in SQL.
#[derive(Debug, Clone)]
pub struct PgStoryStore {
    pool: PgPool,
}

impl PgStoryStore {
    /// Create a new story store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<Story> for PgStoryStore {
    async fn list(&self) -> Result<Vec<Story>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoryRow>(&format!(
            "SELECT {COLUMNS} FROM stories ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: StoryId) -> Result<Option<Story>, RepositoryError> {
        let row = sqlx::query_as::<_, StoryRow>(&format!(
            "SELECT {COLUMNS} FROM stories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert(&self, fields: &StoryFields, actor: AdminUserId) -> Result<Story, RepositoryError> {
        let row = sqlx::query_as::<_, StoryRow>(&format!(
            r"
            INSERT INTO stories (title, content, excerpt, category, featured_image_url, status,
                                 author_name, author_role, read_time_minutes, is_featured,
                                 published_at, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    CASE WHEN $6 = 'published' THEN NOW() ELSE NULL END, $11)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(&fields.excerpt)
        .bind(fields.category)
        .bind(&fields.featured_image_url)
        .bind(fields.status)
        .bind(&fields.author_name)
        .bind(&fields.author_role)
        .bind(fields.read_time_minutes)
        .bind(fields.is_featured)
        .bind(actor)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: StoryId,
        fields: &StoryFields,
    ) -> Result<Option<Story>, RepositoryError> {
        let row = sqlx::query_as::<_, StoryRow>(&format!(
            r"
            UPDATE stories
               SET title = $2, content = $3, excerpt = $4, category = $5,
                   featured_image_url = $6, status = $7, author_name = $8,
                   author_role = $9, read_time_minutes = $10, is_featured = $11,
                   published_at = CASE WHEN $7 = 'published'
                                       THEN COALESCE(published_at, NOW())
                                       ELSE NULL END,
                   updated_at = NOW()
             WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(&fields.excerpt)
        .bind(fields.category)
        .bind(&fields.featured_image_url)
        .bind(fields.status)
        .bind(&fields.author_name)
        .bind(&fields.author_role)
        .bind(fields.read_time_minutes)
        .bind(fields.is_featured)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: StoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM stories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
