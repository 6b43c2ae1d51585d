//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login form
//! POST /auth/logout            - Logout
//! POST /api/auth/login         - JSON login
//! GET  /api/auth/session       - Current admin
//!
//! # Dashboard
//! GET  /                       - Dashboard overview
//! GET  /api/dashboard/stats    - Counts and donation totals
//!
//! # Content
//! GET  /api/content            - List sections
//! GET  /api/content/{section}  - One section
//! PUT  /api/content/{section}  - Upsert a section
//!
//! # Entities (programs, stories, gallery, events, donations, volunteers)
//! GET|POST        /api/{kind}
//! GET|PUT|DELETE  /api/{kind}/{id}
//!
//! # Uploads
//! POST /api/uploads/{bucket}   - Multipart image upload
//! ```
//!
//! Health checks are added by the binary, which also mounts
//! [`uploaded_files`] under `/uploads` when storage is local.

pub mod auth;
pub mod content;
pub mod dashboard;
pub mod entities;
pub mod uploads;

use std::path::Path;

use axum::http::{
    HeaderValue,
    header::{CONTENT_SECURITY_POLICY, X_CONTENT_TYPE_OPTIONS},
};
use axum::{Router, extract::DefaultBodyLimit};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::security_headers_middleware;
use crate::state::AppState;

/// Room for multipart boundaries and headers around an upload.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// All admin routes, without state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(content::router())
        .merge(entities::router())
        .merge(uploads::router())
}

/// The admin application with sessions, security headers, and body limits.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let body_limit = state.uploads().max_bytes() + MULTIPART_OVERHEAD_BYTES;

    routes()
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(session_layer)
        .with_state(state)
}

/// Locally stored uploads, served from `dir`.
///
/// Served files run on the admin origin, so responses are sandboxed and
/// never sniffed into a scriptable type.
pub fn uploaded_files(dir: impl AsRef<Path>) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(SetResponseHeaderLayer::overriding(
            CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; sandbox"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
}
