//! Route definitions for the public site.

pub mod home;

use axum::{Router, http::Uri, routing::get};

use crate::error::SiteError;
use crate::state::AppState;

/// Build the site router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> SiteError {
    SiteError::NotFound(uri.path().to_string())
}
