//! `programs` persistence.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use garuda_core::{AdminUserId, ProgramCategory, ProgramId, ProgramStatus};

use super::{EntityStore, RepositoryError};
use crate::models::{Program, ProgramFields};

const COLUMNS: &str = "id, title, category, description, detailed_description, image_url, \
                       status, start_date, end_date, location, beneficiaries_count, \
                       budget_allocated, budget_spent, created_by, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ProgramRow {
    id: ProgramId,
    title: String,
    category: ProgramCategory,
    description: Option<String>,
    detailed_description: Option<String>,
    image_url: Option<String>,
    status: ProgramStatus,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    location: Option<String>,
    beneficiaries_count: Option<i32>,
    budget_allocated: Option<Decimal>,
    budget_spent: Option<Decimal>,
    created_by: Option<AdminUserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProgramRow> for Program {
    fn from(row: ProgramRow) -> Self {
        Self {
            id: row.id,
            fields: ProgramFields {
                title: row.title,
                category: row.category,
                description: row.description,
                detailed_description: row.detailed_description,
                image_url: row.image_url,
                status: row.status,
                start_date: row.start_date,
                end_date: row.end_date,
                location: row.location,
                beneficiaries_count: row.beneficiaries_count,
                budget_allocated: row.budget_allocated,
                budget_spent: row.budget_spent,
            },
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `PostgreSQL`-backed program store.
#[derive(Debug, Clone)]
pub struct PgProgramStore {
    pool: PgPool,
}

impl PgProgramStore {
    /// Create a new program store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<Program> for PgProgramStore {
    async fn list(&self) -> Result<Vec<Program>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProgramRow>(&format!(
            "SELECT {COLUMNS} FROM programs ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: ProgramId) -> Result<Option<Program>, RepositoryError> {
        let row = sqlx::query_as::<_, ProgramRow>(&format!(
            "SELECT {COLUMNS} FROM programs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert(
        &self,
        fields: &ProgramFields,
        actor: AdminUserId,
    ) -> Result<Program, RepositoryError> {
        let row = sqlx::query_as::<_, ProgramRow>(&format!(
            r"
            INSERT INTO programs (title, category, description, detailed_description,
                                  image_url, status, start_date, end_date, location,
                                  beneficiaries_count, budget_allocated, budget_spent,
                                  created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&fields.title)
        .bind(fields.category)
        .bind(&fields.description)
        .bind(&fields.detailed_description)
        .bind(&fields.image_url)
        .bind(fields.status)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(&fields.location)
        .bind(fields.beneficiaries_count)
        .bind(fields.budget_allocated)
        .bind(fields.budget_spent)
        .bind(actor)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: ProgramId,
        fields: &ProgramFields,
    ) -> Result<Option<Program>, RepositoryError> {
        let row = sqlx::query_as::<_, ProgramRow>(&format!(
            r"
            UPDATE programs
               SET title = $2, category = $3, description = $4, detailed_description = $5,
                   image_url = $6, status = $7, start_date = $8, end_date = $9,
                   location = $10, beneficiaries_count = $11, budget_allocated = $12,
                   budget_spent = $13, updated_at = NOW()
             WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(&fields.title)
        .bind(fields.category)
        .bind(&fields.description)
        .bind(&fields.detailed_description)
        .bind(&fields.image_url)
        .bind(fields.status)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(&fields.location)
        .bind(fields.beneficiaries_count)
        .bind(fields.budget_allocated)
        .bind(fields.budget_spent)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: ProgramId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM programs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM programs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
