//! Integration tests for the Garuda Dhruvam admin dashboard.
//!
//! The tests wire the real services and router to the in-memory stores from
//! `garuda_admin::db::memory`, so they run without a database.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p garuda-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `content` - Content repository semantics
//! - `entities` - Entity managers and dashboard stats
//! - `uploads` - Image upload validation
//! - `sessions` - Login, expiry and session invalidation
//! - `http` - The router end to end

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use chrono::Duration;
use secrecy::SecretString;
use tower_sessions::{MemoryStore, Session};

use garuda_admin::db::AdminUserStore;
use garuda_admin::db::memory::{MemoryAdminUserStore, MemoryEntityStore, MemorySectionStore};
use garuda_admin::middleware::create_session_layer;
use garuda_admin::models::admin_user::NewAdminUser;
use garuda_admin::models::{
    AdminUser, CurrentAdmin, Donation, Event, GalleryItem, Program, Story, Volunteer,
};
use garuda_admin::routes;
use garuda_admin::services::auth::hash_password;
use garuda_admin::services::uploads::MemoryObjectStore;
use garuda_admin::services::{
    AuthService, ContentRepository, EntityManager, Managers, PasswordIdentityProvider,
    UploadService,
};
use garuda_admin::state::AppState;
use garuda_core::{AdminRole, Email};

/// Password given to every admin created by [`Harness::admin`].
pub const PASSWORD: &str = "saffron-kite-41-lotus";

/// Login lifetime used by the harness.
pub const SESSION_HOURS: i64 = 24;

/// Upload limit used by the harness: 5 MiB.
pub const UPLOAD_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Services wired to in-memory stores, with handles to inspect each store.
pub struct Harness {
    pub sections: Arc<MemorySectionStore>,
    pub admins: Arc<MemoryAdminUserStore>,
    pub programs: Arc<MemoryEntityStore<Program>>,
    pub stories: Arc<MemoryEntityStore<Story>>,
    pub gallery: Arc<MemoryEntityStore<GalleryItem>>,
    pub events: Arc<MemoryEntityStore<Event>>,
    pub donations: Arc<MemoryEntityStore<Donation>>,
    pub volunteers: Arc<MemoryEntityStore<Volunteer>>,
    pub objects: Arc<MemoryObjectStore>,
    pub state: AppState,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Fresh, empty stores.
    #[must_use]
    pub fn new() -> Self {
        let sections = Arc::new(MemorySectionStore::new());
        let admins = Arc::new(MemoryAdminUserStore::new());
        let programs: Arc<MemoryEntityStore<Program>> = Arc::new(MemoryEntityStore::new());
        let stories: Arc<MemoryEntityStore<Story>> = Arc::new(MemoryEntityStore::new());
        let gallery: Arc<MemoryEntityStore<GalleryItem>> = Arc::new(MemoryEntityStore::new());
        let events: Arc<MemoryEntityStore<Event>> = Arc::new(MemoryEntityStore::new());
        let donations: Arc<MemoryEntityStore<Donation>> = Arc::new(MemoryEntityStore::new());
        let volunteers: Arc<MemoryEntityStore<Volunteer>> = Arc::new(MemoryEntityStore::new());
        let objects = Arc::new(MemoryObjectStore::new());

        let identity = Arc::new(PasswordIdentityProvider::new(admins.clone()));
        let auth = AuthService::new(identity, Duration::hours(SESSION_HOURS));
        let content = ContentRepository::new(sections.clone());
        let managers = Managers {
            programs: EntityManager::new(programs.clone()),
            stories: EntityManager::new(stories.clone()),
            gallery: EntityManager::new(gallery.clone()),
            events: EntityManager::new(events.clone()),
            donations: EntityManager::new(donations.clone()),
            volunteers: EntityManager::new(volunteers.clone()),
        };
        let uploads = UploadService::new(objects.clone(), UPLOAD_MAX_BYTES);

        let state = AppState::new(auth, content, managers, uploads);

        Self {
            sections,
            admins,
            programs,
            stories,
            gallery,
            events,
            donations,
            volunteers,
            objects,
            state,
        }
    }

    /// Provision an active admin with [`PASSWORD`].
    pub async fn admin(&self, email: &str) -> AdminUser {
        self.admins
            .create(&NewAdminUser {
                email: Email::parse(email).unwrap(),
                full_name: "Test Admin".to_string(),
                role: AdminRole::Admin,
                password_hash: SecretString::from(hash_password(PASSWORD).unwrap()),
            })
            .await
            .unwrap()
    }

    /// A new admin signed in on a fresh session.
    pub async fn signed_in(&self) -> (Session, CurrentAdmin) {
        self.admin("editor@garudadhruvam.org").await;
        let session = new_session();
        let current = self
            .state
            .auth()
            .login(
                &session,
                "editor@garudadhruvam.org",
                &SecretString::from(PASSWORD),
            )
            .await
            .unwrap();
        (session, current)
    }

    /// The full admin router backed by an in-memory session store.
    #[must_use]
    pub fn router(&self) -> Router {
        let session_layer = create_session_layer(MemoryStore::default(), false, SESSION_HOURS);
        routes::app(self.state.clone(), session_layer)
    }
}

/// A session on its own in-memory store.
#[must_use]
pub fn new_session() -> Session {
    Session::new(None, Arc::new(MemoryStore::default()), None)
}

/// The `name=value` part of a response's session cookie.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response sets a session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// A JSON request, optionally carrying a session cookie.
#[must_use]
pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// A bodiless request, optionally carrying a session cookie.
#[must_use]
pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
