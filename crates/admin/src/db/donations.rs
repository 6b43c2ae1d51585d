//! `donations` persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use garuda_core::{
    AdminUserId, CurrencyCode, DonationId, DonationPurpose, DonationType, PaymentMethod,
    PaymentStatus,
};

use super::{EntityStore, RepositoryError};
use crate::models::{Donation, DonationFields};

const COLUMNS: &str = "id, donor_name, donor_email, donor_phone, amount, currency, \
                       donation_type, purpose, payment_method, payment_status, \
                       transaction_id, notes, is_anonymous, receipt_sent, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct DonationRow {
    id: DonationId,
    donor_name: String,
    donor_email: Option<String>,
    donor_phone: Option<String>,
    amount: Decimal,
    currency: CurrencyCode,
    donation_type: DonationType,
    purpose: DonationPurpose,
    payment_method: PaymentMethod,
    payment_status: PaymentStatus,
    transaction_id: Option<String>,
    notes: Option<String>,
    is_anonymous: bool,
    receipt_sent: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DonationRow> for Donation {
    fn from(row: DonationRow) -> Self {
        Self {
            id: row.id,
            fields: DonationFields {
                donor_name: row.donor_name,
                donor_email: row.donor_email,
                donor_phone: row.donor_phone,
                amount: row.amount,
                currency: row.currency,
                donation_type: row.donation_type,
                purpose: row.purpose,
                payment_method: row.payment_method,
                payment_status: row.payment_status,
                transaction_id: row.transaction_id,
                notes: row.notes,
                is_anonymous: row.is_anonymous,
                receipt_sent: row.receipt_sent,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `PostgreSQL`-backed donation store.
#[derive(Debug, Clone)]
pub struct PgDonationStore {
    pool: PgPool,
}

impl PgDonationStore {
    /// Create a new donation store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<Donation> for PgDonationStore {
    async fn list(&self) -> Result<Vec<Donation>, RepositoryError> {
        let rows = sqlx::query_as::<_, DonationRow>(&format!(
            "SELECT {COLUMNS} FROM donations ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: DonationId) -> Result<Option<Donation>, RepositoryError> {
        let row = sqlx::query_as::<_, DonationRow>(&format!(
            "SELECT {COLUMNS} FROM donations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert(
        &self,
        fields: &DonationFields,
        _actor: AdminUserId,
    ) -> Result<Donation, RepositoryError> {
        let row = sqlx::query_as::<_, DonationRow>(&format!(
            r"
            INSERT INTO donations (donor_name, donor_email, donor_phone, amount, currency,
                                   donation_type, purpose, payment_method, payment_status,
                                   transaction_id, notes, is_anonymous, receipt_sent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&fields.donor_name)
        .bind(&fields.donor_email)
        .bind(&fields.donor_phone)
        .bind(fields.amount)
        .bind(fields.currency)
        .bind(fields.donation_type)
        .bind(fields.purpose)
        .bind(fields.payment_method)
        .bind(fields.payment_status)
        .bind(&fields.transaction_id)
        .bind(&fields.notes)
        .bind(fields.is_anonymous)
        .bind(fields.receipt_sent)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: DonationId,
        fields: &DonationFields,
    ) -> Result<Option<Donation>, RepositoryError> {
        let row = sqlx::query_as::<_, DonationRow>(&format!(
            r"
            UPDATE donations
               SET donor_name = $2, donor_email = $3, donor_phone = $4, amount = $5,
                   currency = $6, donation_type = $7, purpose = $8, payment_method = $9,
                   payment_status = $10, transaction_id = $11, notes = $12,
                   is_anonymous = $13, receipt_sent = $14, updated_at = NOW()
             WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(&fields.donor_name)
        .bind(&fields.donor_email)
        .bind(&fields.donor_phone)
        .bind(fields.amount)
        .bind(fields.currency)
        .bind(fields.donation_type)
        .bind(fields.purpose)
        .bind(fields.payment_method)
        .bind(fields.payment_status)
        .bind(&fields.transaction_id)
        .bind(&fields.notes)
        .bind(fields.is_anonymous)
        .bind(fields.receipt_sent)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: DonationId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM donations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM donations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
