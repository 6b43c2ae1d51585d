//! Session middleware configuration for admin.
//!
//! Sessions live server-side; the cookie carries only the session id.
//! `SameSite=Strict`, `HttpOnly`, `Secure` when served over https, and an
//! inactivity expiry matching the maximum login age.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "gd_admin_session";

/// Create the session layer over any session store.
///
/// `PostgresStore` in production, `MemoryStore` in tests.
#[must_use]
pub fn create_session_layer<S>(store: S, secure: bool, idle_hours: i64) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::hours(idle_hours),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
