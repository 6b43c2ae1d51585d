//! Admin authentication service.
//!
//! Identity is answered by exactly one [`IdentityProvider`]; the session only
//! caches who signed in and when. A request moves through
//! Anonymous → Authenticating → Authenticated, and back to Anonymous on
//! logout, expiry, a corrupt record, or when the admin is deactivated.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;
use tracing::{info, warn};

use garuda_core::{AdminUserId, Email};

use crate::db::AdminUserStore;
use crate::models::session::keys;
use crate::models::{AdminUser, CurrentAdmin};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 12;

/// Verified against when no active admin matches, so unknown emails cost the
/// same Argon2 work as a wrong password. Uses the default Argon2id params.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$Z2FydWRhLWRocnV2YW0teA$7Zr3F4t01paHoCnU+9S4/e+Lw9HSmdzlm2zEAO2jitQ";

/// Source of truth for admin identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify credentials and return the active admin they belong to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email, an
    /// inactive admin or a wrong secret.
    async fn sign_in(&self, email: &str, secret: &SecretString) -> Result<AdminUser, AuthError>;

    /// Look up an admin by id; `None` if missing or deactivated.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    async fn find_active(&self, id: AdminUserId) -> Result<Option<AdminUser>, AuthError>;
}

/// Email + Argon2id password identity backed by `admin_users`.
#[derive(Clone)]
pub struct PasswordIdentityProvider {
    users: Arc<dyn AdminUserStore>,
}

impl PasswordIdentityProvider {
    /// Create a provider over an admin user store.
    #[must_use]
    pub fn new(users: Arc<dyn AdminUserStore>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl IdentityProvider for PasswordIdentityProvider {
    async fn sign_in(&self, email: &str, secret: &SecretString) -> Result<AdminUser, AuthError> {
        let user = match Email::parse(email) {
            Ok(email) => self.users.get_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(user) = user.filter(|u| u.is_active) else {
            let _ = verify_password(secret.expose_secret(), DUMMY_PASSWORD_HASH);
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(secret.expose_secret(), user.password_hash.expose_secret())?;

        Ok(user)
    }

    async fn find_active(&self, id: AdminUserId) -> Result<Option<AdminUser>, AuthError> {
        Ok(self.users.get_by_id(id).await?.filter(|u| u.is_active))
    }
}

/// Session-level login state.
#[derive(Clone)]
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    max_age: Duration,
}

impl AuthService {
    /// Create a new authentication service.
    ///
    /// Sessions older than `max_age` since login are discarded.
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityProvider>, max_age: Duration) -> Self {
        Self { identity, max_age }
    }

    /// Sign in and bind the admin to `session`.
    ///
    /// The session id is rotated before the record is written.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if sign-in fails, or
    /// `AuthError::Session` if the session cannot be updated.
    pub async fn login(
        &self,
        session: &Session,
        email: &str,
        secret: &SecretString,
    ) -> Result<CurrentAdmin, AuthError> {
        let user = match self.identity.sign_in(email, secret).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "admin login rejected");
                return Err(e);
            }
        };

        let current = CurrentAdmin::from_user(&user, Utc::now());
        session.cycle_id().await?;
        session.insert(keys::CURRENT_ADMIN, &current).await?;

        info!(admin_id = %current.id, role = %current.role, "admin logged in");
        Ok(current)
    }

    /// The admin bound to `session`, if the binding is still valid.
    ///
    /// Corrupt, expired, or deactivated bindings are removed from the session
    /// and reported as `None`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` or `AuthError::Repository` when the
    /// backends fail.
    pub async fn current_session(
        &self,
        session: &Session,
    ) -> Result<Option<CurrentAdmin>, AuthError> {
        let Some(raw) = session.get_value(keys::CURRENT_ADMIN).await? else {
            return Ok(None);
        };

        let current = match serde_json::from_value::<CurrentAdmin>(raw) {
            Ok(current) => current,
            Err(e) => {
                warn!(error = %e, "discarding unreadable admin session");
                session.remove_value(keys::CURRENT_ADMIN).await?;
                return Ok(None);
            }
        };

        if current.is_expired(self.max_age, Utc::now()) {
            info!(admin_id = %current.id, "admin session expired");
            session.remove_value(keys::CURRENT_ADMIN).await?;
            return Ok(None);
        }

        if self.identity.find_active(current.id).await?.is_none() {
            warn!(admin_id = %current.id, "admin no longer active, ending session");
            session.remove_value(keys::CURRENT_ADMIN).await?;
            return Ok(None);
        }

        Ok(Some(current))
    }

    /// Clear everything stored in `session`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the session store fails.
    pub async fn logout(&self, session: &Session) -> Result<(), AuthError> {
        session.flush().await?;
        Ok(())
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` for short passwords and
/// `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::db::memory::MemoryAdminUserStore;
    use crate::models::admin_user::{AdminRole, NewAdminUser};

    const PASSWORD: &str = "lotus-and-lamp-2026";

    async fn setup() -> (AuthService, Arc<MemoryAdminUserStore>, Session) {
        let users = Arc::new(MemoryAdminUserStore::new());
        users
            .create(&NewAdminUser {
                email: Email::parse("seva@example.org").unwrap(),
                full_name: "Seva Admin".to_string(),
                role: AdminRole::Admin,
                password_hash: SecretString::from(hash_password(PASSWORD).unwrap()),
            })
            .await
            .unwrap();

        let identity = Arc::new(PasswordIdentityProvider::new(users.clone()));
        let auth = AuthService::new(identity, Duration::hours(24));
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        (auth, users, session)
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password(PASSWORD).unwrap();
        assert!(verify_password(PASSWORD, &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password-here", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_dummy_hash_costs_the_same_as_a_real_one() {
        let params = |phc: &str| phc.split('$').nth(3).unwrap().to_string();
        let real = hash_password(PASSWORD).unwrap();

        assert!(PasswordHash::new(DUMMY_PASSWORD_HASH).is_ok());
        assert_eq!(params(DUMMY_PASSWORD_HASH), params(&real));
        assert!(matches!(
            verify_password(PASSWORD, DUMMY_PASSWORD_HASH),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_emails_rejected_alike() {
        let (auth, _, session) = setup().await;
        for email in ["nobody@example.org", "not-an-email"] {
            let result = auth
                .login(&session, email, &SecretString::from(PASSWORD))
                .await;
            assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        }
        assert!(auth.current_session(&session).await.unwrap().is_none());
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(hash_password("short"), Err(AuthError::WeakPassword(_))));
    }

    #[tokio::test]
    async fn test_login_binds_session() {
        let (auth, _, session) = setup().await;
        let current = auth
            .login(&session, "Seva@Example.org", &SecretString::from(PASSWORD))
            .await
            .unwrap();

        assert_eq!(current.email.as_str(), "seva@example.org");
        assert_eq!(auth.current_session(&session).await.unwrap(), Some(current));
    }

    #[tokio::test]
    async fn test_wrong_password_leaves_session_anonymous() {
        let (auth, _, session) = setup().await;
        let result = auth
            .login(&session, "seva@example.org", &SecretString::from("not-the-password"))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert!(auth.current_session(&session).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deactivated_admin_loses_session() {
        let (auth, users, session) = setup().await;
        auth.login(&session, "seva@example.org", &SecretString::from(PASSWORD))
            .await
            .unwrap();

        let email = Email::parse("seva@example.org").unwrap();
        users.set_active(&email, false).await.unwrap();

        assert!(auth.current_session(&session).await.unwrap().is_none());
        assert!(session.get_value(keys::CURRENT_ADMIN).await.unwrap().is_none());
        assert!(matches!(
            auth.login(&session, "seva@example.org", &SecretString::from(PASSWORD))
                .await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (auth, _, session) = setup().await;
        auth.login(&session, "seva@example.org", &SecretString::from(PASSWORD))
            .await
            .unwrap();
        auth.logout(&session).await.unwrap();

        assert!(auth.current_session(&session).await.unwrap().is_none());
    }
}
