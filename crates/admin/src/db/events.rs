//! `events` persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use garuda_core::{AdminUserId, EventId, EventStatus, EventType};

use super::{EntityStore, RepositoryError};
use crate::models::{Event, EventFields};

const COLUMNS: &str = "id, title, description, detailed_description, event_date, end_date, \
                       location, event_type, image_url, status, max_participants, \
                       registered_participants, registration_fee, contact_person, \
                       contact_email, contact_phone, created_by, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: EventId,
    title: String,
    description: Option<String>,
    detailed_description: Option<String>,
    event_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    location: String,
    event_type: EventType,
    image_url: Option<String>,
    status: EventStatus,
    max_participants: Option<i32>,
    registered_participants: i32,
    registration_fee: Option<Decimal>,
    contact_person: Option<String>,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    created_by: Option<AdminUserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            fields: EventFields {
                title: row.title,
                description: row.description,
                detailed_description: row.detailed_description,
                event_date: row.event_date,
                end_date: row.end_date,
                location: row.location,
                event_type: row.event_type,
                image_url: row.image_url,
                status: row.status,
                max_participants: row.max_participants,
                registered_participants: row.registered_participants,
                registration_fee: row.registration_fee,
                contact_person: row.contact_person,
                contact_email: row.contact_email,
                contact_phone: row.contact_phone,
            },
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `PostgreSQL`-backed event store. Lists soonest event first.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    /// Create a new event store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<Event> for PgEventStore {
    async fn list(&self) -> Result<Vec<Event>, RepositoryError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {COLUMNS} FROM events ORDER BY event_date ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert(&self, fields: &EventFields, actor: AdminUserId) -> Result<Event, RepositoryError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r"
            INSERT INTO events (title, description, detailed_description, event_date, end_date,
                                location, event_type, image_url, status, max_participants,
                                registered_participants, registration_fee, contact_person,
                                contact_email, contact_phone, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.detailed_description)
        .bind(fields.event_date)
        .bind(fields.end_date)
        .bind(&fields.location)
        .bind(fields.event_type)
        .bind(&fields.image_url)
        .bind(fields.status)
        .bind(fields.max_participants)
        .bind(fields.registered_participants)
        .bind(fields.registration_fee)
        .bind(&fields.contact_person)
        .bind(&fields.contact_email)
        .bind(&fields.contact_phone)
        .bind(actor)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: EventId,
        fields: &EventFields,
    ) -> Result<Option<Event>, RepositoryError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r"
            UPDATE events
               SET title = $2, description = $3, detailed_description = $4, event_date = $5,
                   end_date = $6, location = $7, event_type = $8, image_url = $9,
                   status = $10, max_participants = $11, registered_participants = $12,
                   registration_fee = $13, contact_person = $14, contact_email = $15,
                   contact_phone = $16, updated_at = NOW()
             WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.detailed_description)
        .bind(fields.event_date)
        .bind(fields.end_date)
        .bind(&fields.location)
        .bind(fields.event_type)
        .bind(&fields.image_url)
        .bind(fields.status)
        .bind(fields.max_participants)
        .bind(fields.registered_participants)
        .bind(fields.registration_fee)
        .bind(&fields.contact_person)
        .bind(&fields.contact_email)
        .bind(&fields.contact_phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: EventId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
