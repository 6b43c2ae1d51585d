//! Persistence for the admin dashboard.
//!
//! # Tables
//!
//! - `admin_users` - Dashboard principals (Argon2id password hashes)
//! - `website_content` - One JSON payload per `section_name`
//! - `programs`, `stories`, `gallery`, `events`, `donations`, `volunteers`
//! - `tower_sessions.session` - Server-side sessions (managed by `tower-sessions-sqlx-store`)
//!
//! Services talk to the store traits below, never to `sqlx` directly, so the
//! `PostgreSQL` implementations can be swapped for the in-memory ones in
//! [`memory`] under test.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p garuda-cli -- migrate
//! ```

pub mod admin_users;
pub mod content;
pub mod donations;
pub mod events;
pub mod gallery;
pub mod memory;
pub mod programs;
pub mod stories;
pub mod volunteers;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use garuda_core::AdminUserId;
use garuda_core::content::SectionName;

use crate::models::admin_user::NewAdminUser;
use crate::models::{AdminUser, ContentSection, Entity};

pub use admin_users::PgAdminUserStore;
pub use content::PgSectionStore;
pub use donations::PgDonationStore;
pub use events::PgEventStore;
pub use gallery::PgGalleryStore;
pub use programs::PgProgramStore;
pub use stories::PgStoryStore;
pub use volunteers::PgVolunteerStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map unique violations to [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(what: &'static str) -> impl FnOnce(sqlx::Error) -> RepositoryError {
    move |e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict(format!("{what} already exists"));
        }
        RepositoryError::Database(e)
    }
}

/// Key-value access to `website_content`.
#[async_trait]
pub trait SectionStore: Send + Sync {
    /// Look up one section; `None` when no row exists yet.
    async fn fetch(&self, name: &SectionName) -> Result<Option<ContentSection>, RepositoryError>;

    /// Insert or overwrite the row for `name` in a single statement.
    async fn upsert(
        &self,
        name: &SectionName,
        content: &Value,
        updated_by: Option<AdminUserId>,
    ) -> Result<ContentSection, RepositoryError>;

    /// Insert only when no row exists; returns whether a row was written.
    async fn insert_if_absent(
        &self,
        name: &SectionName,
        content: &Value,
    ) -> Result<bool, RepositoryError>;

    /// Every section, ordered by name.
    async fn list(&self) -> Result<Vec<ContentSection>, RepositoryError>;
}

/// Admin principals.
#[async_trait]
pub trait AdminUserStore: Send + Sync {
    /// Look up an admin by (normalized) email.
    async fn get_by_email(
        &self,
        email: &garuda_core::Email,
    ) -> Result<Option<AdminUser>, RepositoryError>;

    /// Look up an admin by id.
    async fn get_by_id(&self, id: AdminUserId) -> Result<Option<AdminUser>, RepositoryError>;

    /// Provision a new admin. Fails with `Conflict` on a duplicate email.
    async fn create(&self, user: &NewAdminUser) -> Result<AdminUser, RepositoryError>;

    /// Set the active flag; returns `false` if no such admin exists.
    async fn set_active(
        &self,
        email: &garuda_core::Email,
        active: bool,
    ) -> Result<bool, RepositoryError>;
}

/// CRUD access to one entity table.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// All records in the entity's listing order.
    async fn list(&self) -> Result<Vec<E>, RepositoryError>;

    /// One record by id.
    async fn get(&self, id: E::Id) -> Result<Option<E>, RepositoryError>;

    /// Insert a record; `actor` is recorded as creator where the table has one.
    async fn insert(&self, fields: &E::Fields, actor: AdminUserId) -> Result<E, RepositoryError>;

    /// Overwrite a record's fields; `None` when the id does not exist.
    async fn update(&self, id: E::Id, fields: &E::Fields) -> Result<Option<E>, RepositoryError>;

    /// Delete exactly one record; `false` when the id does not exist.
    async fn delete(&self, id: E::Id) -> Result<bool, RepositoryError>;

    /// Number of records.
    async fn count(&self) -> Result<i64, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
