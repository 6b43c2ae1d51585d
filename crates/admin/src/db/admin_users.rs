//! Admin user persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use garuda_core::{AdminRole, AdminUserId, Email};

use super::{AdminUserStore, RepositoryError, conflict_on_unique};
use crate::models::AdminUser;
use crate::models::admin_user::NewAdminUser;

const COLUMNS: &str =
    "id, email, full_name, role, is_active, password_hash, created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` admin user queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: AdminUserId,
    email: String,
    full_name: String,
    role: String,
    is_active: bool,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AdminUserRow> for AdminUser {
    type Error = RepositoryError;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let role = row
            .role
            .parse::<AdminRole>()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            id: row.id,
            email,
            full_name: row.full_name,
            role,
            is_active: row.is_active,
            password_hash: SecretString::from(row.password_hash),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// `PostgreSQL`-backed [`AdminUserStore`].
#[derive(Debug, Clone)]
pub struct PgAdminUserStore {
    pool: PgPool,
}

impl PgAdminUserStore {
    /// Create a new admin user store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminUserStore for PgAdminUserStore {
    async fn get_by_email(&self, email: &Email) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            "SELECT {COLUMNS} FROM admin_users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_by_id(&self, id: AdminUserId) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            "SELECT {COLUMNS} FROM admin_users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create(&self, user: &NewAdminUser) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            r"
            INSERT INTO admin_users (email, full_name, role, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "
        ))
        .bind(user.email.as_str())
        .bind(&user.full_name)
        .bind(user.role.as_str())
        .bind(user.password_hash.expose_secret())
        .fetch_one(&self.pool)
        .await
        .map_err(conflict_on_unique("email"))?;

        row.try_into()
    }

    async fn set_active(&self, email: &Email, active: bool) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE admin_users SET is_active = $2, updated_at = NOW() WHERE email = $1",
        )
        .bind(email.as_str())
        .bind(active)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
