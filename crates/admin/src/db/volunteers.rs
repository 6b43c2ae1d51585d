//! `volunteers` persistence.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use garuda_core::{
    AdminUserId, BackgroundCheckStatus, ExperienceLevel, VolunteerId, VolunteerStatus,
};

use super::{EntityStore, RepositoryError, conflict_on_unique};
use crate::models::{Volunteer, VolunteerFields};

const COLUMNS: &str = "id, full_name, email, phone, address, skills, interests, availability, \
                       experience_level, background_check_status, emergency_contact_name, \
                       emergency_contact_phone, status, joined_date, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct VolunteerRow {
    id: VolunteerId,
    full_name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    skills: Vec<String>,
    interests: Vec<String>,
    availability: Option<String>,
    experience_level: ExperienceLevel,
    background_check_status: BackgroundCheckStatus,
    emergency_contact_name: Option<String>,
    emergency_contact_phone: Option<String>,
    status: VolunteerStatus,
    joined_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VolunteerRow> for Volunteer {
    fn from(row: VolunteerRow) -> Self {
        Self {
            id: row.id,
            fields: VolunteerFields {
                full_name: row.full_name,
                email: row.email,
                phone: row.phone,
                address: row.address,
                skills: row.skills,
                interests: row.interests,
                availability: row.availability,
                experience_level: row.experience_level,
                background_check_status: row.background_check_status,
                emergency_contact_name: row.emergency_contact_name,
                emergency_contact_phone: row.emergency_contact_phone,
                status: row.status,
                joined_date: row.joined_date,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `PostgreSQL`-backed volunteer store. Emails are unique.
#[derive(Debug, Clone)]
pub struct PgVolunteerStore {
    pool: PgPool,
}

impl PgVolunteerStore {
    /// Create a new volunteer store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<Volunteer> for PgVolunteerStore {
    async fn list(&self) -> Result<Vec<Volunteer>, RepositoryError> {
        let rows = sqlx::query_as::<_, VolunteerRow>(&format!(
            "SELECT {COLUMNS} FROM volunteers ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError> {
        let row = sqlx::query_as::<_, VolunteerRow>(&format!(
            "SELECT {COLUMNS} FROM volunteers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert(
        &self,
        fields: &VolunteerFields,
        _actor: AdminUserId,
    ) -> Result<Volunteer, RepositoryError> {
        let row = sqlx::query_as::<_, VolunteerRow>(&format!(
            r"
            INSERT INTO volunteers (full_name, email, phone, address, skills, interests,
                                    availability, experience_level, background_check_status,
                                    emergency_contact_name, emergency_contact_phone, status,
                                    joined_date)
            VALUES ($1, LOWER($2), $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&fields.full_name)
        .bind(fields.email.trim())
        .bind(&fields.phone)
        .bind(&fields.address)
        .bind(&fields.skills)
        .bind(&fields.interests)
        .bind(&fields.availability)
        .bind(fields.experience_level)
        .bind(fields.background_check_status)
        .bind(&fields.emergency_contact_name)
        .bind(&fields.emergency_contact_phone)
        .bind(fields.status)
        .bind(fields.joined_date)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict_on_unique("volunteer email"))?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: VolunteerId,
        fields: &VolunteerFields,
    ) -> Result<Option<Volunteer>, RepositoryError> {
        let row = sqlx::query_as::<_, VolunteerRow>(&format!(
            r"
            UPDATE volunteers
               SET full_name = $2, email = LOWER($3), phone = $4, address = $5, skills = $6,
                   interests = $7, availability = $8, experience_level = $9,
                   background_check_status = $10, emergency_contact_name = $11,
                   emergency_contact_phone = $12, status = $13, joined_date = $14,
                   updated_at = NOW()
             WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(&fields.full_name)
        .bind(fields.email.trim())
        .bind(&fields.phone)
        .bind(&fields.address)
        .bind(&fields.skills)
        .bind(&fields.interests)
        .bind(&fields.availability)
        .bind(fields.experience_level)
        .bind(fields.background_check_status)
        .bind(&fields.emergency_contact_name)
        .bind(&fields.emergency_contact_phone)
        .bind(fields.status)
        .bind(fields.joined_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(conflict_on_unique("volunteer email"))?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: VolunteerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM volunteers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM volunteers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
