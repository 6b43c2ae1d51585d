//! Admin user domain types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use garuda_core::{AdminUserId, Email};

pub use garuda_core::AdminRole;

/// An admin user (domain type).
///
/// Created out-of-band by `gd-cli admin create` and never hard-deleted;
/// deactivation flips `is_active`.
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Admin's email address (lowercase).
    pub email: Email,
    /// Admin's display name.
    pub full_name: String,
    /// Admin's role/permission level.
    pub role: AdminRole,
    /// Inactive admins cannot log in and lose existing sessions.
    pub is_active: bool,
    /// Argon2id PHC string.
    pub password_hash: SecretString,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
    /// When the admin was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields for provisioning a new admin.
#[derive(Debug, Clone)]
pub struct NewAdminUser {
    pub email: Email,
    pub full_name: String,
    pub role: AdminRole,
    pub password_hash: SecretString,
}
