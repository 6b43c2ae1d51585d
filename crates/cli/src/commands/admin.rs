//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin user (password from ADMIN_PASSWORD)
//! gd-cli admin create -e admin@example.org -n "Admin Name" -r super_admin
//!
//! # Deactivate an admin user
//! gd-cli admin deactivate -e admin@example.org
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string
//! - `ADMIN_PASSWORD` - Initial password for `admin create`

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use garuda_admin::db::{AdminUserStore, PgAdminUserStore, RepositoryError};
use garuda_admin::models::admin_user::NewAdminUser;
use garuda_admin::services::auth::{AuthError, hash_password};
use garuda_core::{AdminRole, AdminUserId, Email};

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Could not reach the database.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: super_admin, admin, editor")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] garuda_core::EmailError),

    /// Password rejected or could not be hashed.
    #[error(transparent)]
    Password(#[from] AuthError),

    /// User already exists.
    #[error("Admin user already exists with email: {0}")]
    UserExists(String),

    /// No such user.
    #[error("No admin user with email: {0}")]
    UserNotFound(String),

    /// Repository error.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Create a new admin user.
///
/// # Arguments
///
/// * `email` - Admin's email address
/// * `name` - Admin's display name
/// * `role` - Admin's role (`super_admin`, `admin`, or `editor`)
/// * `password` - Initial password, hashed with Argon2id before storage
///
/// # Returns
///
/// The ID of the created admin user.
///
/// # Errors
///
/// Returns an error for invalid input, a duplicate email, or database failure.
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
    password: &SecretString,
) -> Result<AdminUserId, AdminError> {
    // Validate everything before connecting
    let role: AdminRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;
    let email = Email::parse(email)?;
    let password_hash = SecretString::from(hash_password(password.expose_secret())?);

    let store = PgAdminUserStore::new(connect().await?);

    tracing::info!("Creating admin user: {} ({})", email, role);
    let user = store
        .create(&NewAdminUser {
            email: email.clone(),
            full_name: name.trim().to_owned(),
            role,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(email.to_string()),
            other => other.into(),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email,
        user.role
    );

    Ok(user.id)
}

/// Deactivate an admin user.
///
/// The user can no longer sign in, and any existing session is dropped the
/// next time it is checked.
///
/// # Errors
///
/// Returns `UserNotFound` if no admin has this email.
pub async fn deactivate_user(email: &str) -> Result<(), AdminError> {
    let email = Email::parse(email)?;
    let store = PgAdminUserStore::new(connect().await?);

    if !store.set_active(&email, false).await? {
        return Err(AdminError::UserNotFound(email.to_string()));
    }

    tracing::info!("Admin user deactivated: {}", email);
    Ok(())
}
