//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use garuda_core::{AdminUserId, Email};

use super::admin_user::{AdminRole, AdminUser};

/// Session-stored admin identity.
///
/// Written once at login and read by the auth extractor on every request.
/// Anything that fails to deserialize into this shape is treated as
/// logged-out and removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub full_name: String,
    /// Admin's role/permission level.
    pub role: AdminRole,
    /// When the login happened.
    #[serde(rename = "loginTime")]
    pub login_time: DateTime<Utc>,
}

impl CurrentAdmin {
    /// Snapshot an admin user at login.
    #[must_use]
    pub fn from_user(user: &AdminUser, login_time: DateTime<Utc>) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            login_time,
        }
    }

    /// Whether the login is older than `max_age` at `now`.
    #[must_use]
    pub fn is_expired(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        now - self.login_time > max_age
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn admin(login_time: DateTime<Utc>) -> CurrentAdmin {
        CurrentAdmin {
            id: AdminUserId::generate(),
            email: Email::parse("seva@example.org").unwrap(),
            full_name: "Seva Admin".to_string(),
            role: AdminRole::Admin,
            login_time,
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let max_age = Duration::hours(24);
        assert!(!admin(now - Duration::hours(23)).is_expired(max_age, now));
        assert!(admin(now - Duration::hours(25)).is_expired(max_age, now));
    }

    #[test]
    fn test_record_shape() {
        let value = serde_json::to_value(admin(Utc::now())).unwrap();
        for key in ["id", "email", "full_name", "role", "loginTime"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_partial_record_does_not_parse() {
        let value = serde_json::json!({ "id": uuid::Uuid::new_v4(), "email": "a@b.co" });
        assert!(serde_json::from_value::<CurrentAdmin>(value).is_err());
    }
}
