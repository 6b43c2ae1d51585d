//! `website_content` persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use garuda_core::content::SectionName;
use garuda_core::{AdminUserId, ContentSectionId};

use super::{RepositoryError, SectionStore};
use crate::models::ContentSection;

const COLUMNS: &str = "id, section_name, content, last_updated_by, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ContentRow {
    id: ContentSectionId,
    section_name: String,
    content: Value,
    last_updated_by: Option<AdminUserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for ContentSection {
    type Error = RepositoryError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        let section_name = SectionName::parse(&row.section_name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid section name in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            section_name,
            content: row.content,
            last_updated_by: row.last_updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// `PostgreSQL`-backed [`SectionStore`].
#[derive(Debug, Clone)]
pub struct PgSectionStore {
    pool: PgPool,
}

impl PgSectionStore {
    /// Create a new section store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SectionStore for PgSectionStore {
    async fn fetch(&self, name: &SectionName) -> Result<Option<ContentSection>, RepositoryError> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {COLUMNS} FROM website_content WHERE section_name = $1"
        ))
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn upsert(
        &self,
        name: &SectionName,
        content: &Value,
        updated_by: Option<AdminUserId>,
    ) -> Result<ContentSection, RepositoryError> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            r"
            INSERT INTO website_content (section_name, content, last_updated_by)
            VALUES ($1, $2, $3)
            ON CONFLICT (section_name) DO UPDATE
               SET content = EXCLUDED.content,
                   last_updated_by = EXCLUDED.last_updated_by,
                   updated_at = NOW()
            RETURNING {COLUMNS}
            "
        ))
        .bind(name.as_str())
        .bind(content)
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn insert_if_absent(
        &self,
        name: &SectionName,
        content: &Value,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO website_content (section_name, content)
            VALUES ($1, $2)
            ON CONFLICT (section_name) DO NOTHING
            ",
        )
        .bind(name.as_str())
        .bind(content)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn list(&self) -> Result<Vec<ContentSection>, RepositoryError> {
        let rows = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {COLUMNS} FROM website_content ORDER BY section_name"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
