//! Login and session validation.

use chrono::{Duration, Utc};
use secrecy::SecretString;
use serde_json::json;

use garuda_admin::db::AdminUserStore;
use garuda_admin::models::session::keys;
use garuda_admin::services::AuthError;
use garuda_core::Email;
use garuda_integration_tests::{Harness, PASSWORD, SESSION_HOURS, new_session};

const EMAIL: &str = "seva@garudadhruvam.org";

#[tokio::test]
async fn test_login_binds_admin_to_session() {
    let harness = Harness::new();
    let user = harness.admin(EMAIL).await;
    let session = new_session();

    let current = harness
        .state
        .auth()
        .login(&session, EMAIL, &SecretString::from(PASSWORD))
        .await
        .unwrap();
    assert_eq!(current.id, user.id);

    let resolved = harness.state.auth().current_session(&session).await.unwrap();
    assert_eq!(resolved, Some(current));
}

#[tokio::test]
async fn test_wrong_password_is_invalid_credentials() {
    let harness = Harness::new();
    harness.admin(EMAIL).await;
    let session = new_session();

    let err = harness
        .state
        .auth()
        .login(&session, EMAIL, &SecretString::from("not-the-password-at-all"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(session.get_value(keys::CURRENT_ADMIN).await.unwrap().is_none());
}

#[tokio::test]
async fn test_corrupt_session_record_is_discarded() {
    let harness = Harness::new();
    let session = new_session();
    session
        .insert(keys::CURRENT_ADMIN, json!({ "id": 42, "email": [] }))
        .await
        .unwrap();

    let resolved = harness.state.auth().current_session(&session).await.unwrap();

    assert!(resolved.is_none());
    assert!(session.get_value(keys::CURRENT_ADMIN).await.unwrap().is_none());
}

#[tokio::test]
async fn test_expired_session_record_is_discarded() {
    let harness = Harness::new();
    let (session, mut current) = harness.signed_in().await;

    current.login_time = Utc::now() - Duration::hours(SESSION_HOURS + 1);
    session.insert(keys::CURRENT_ADMIN, &current).await.unwrap();

    let resolved = harness.state.auth().current_session(&session).await.unwrap();

    assert!(resolved.is_none());
    assert!(session.get_value(keys::CURRENT_ADMIN).await.unwrap().is_none());
}

#[tokio::test]
async fn test_deactivated_admin_cannot_log_in_and_loses_session() {
    let harness = Harness::new();
    let (session, current) = harness.signed_in().await;

    harness
        .admins
        .set_active(&current.email, false)
        .await
        .unwrap();

    let resolved = harness.state.auth().current_session(&session).await.unwrap();
    assert!(resolved.is_none());

    let err = harness
        .state
        .auth()
        .login(&new_session(), current.email.as_str(), &SecretString::from(PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let harness = Harness::new();
    harness.admin(EMAIL).await;

    let current = harness
        .state
        .auth()
        .login(
            &new_session(),
            "Seva@GarudaDhruvam.org",
            &SecretString::from(PASSWORD),
        )
        .await
        .unwrap();

    assert_eq!(current.email, Email::parse(EMAIL).unwrap());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let harness = Harness::new();
    let (session, _current) = harness.signed_in().await;

    harness.state.auth().logout(&session).await.unwrap();

    assert!(harness.state.auth().current_session(&session).await.unwrap().is_none());
}
