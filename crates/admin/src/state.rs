//! Application state shared across handlers.

use std::sync::Arc;

use crate::services::{AuthService, ContentRepository, Managers, UploadService};

/// Application state shared across all handlers.
///
/// Holds services only; the storage behind them is chosen at startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    auth: AuthService,
    content: ContentRepository,
    managers: Managers,
    uploads: UploadService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        auth: AuthService,
        content: ContentRepository,
        managers: Managers,
        uploads: UploadService,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                auth,
                content,
                managers,
                uploads,
            }),
        }
    }

    /// Login and session checks.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Website content sections.
    #[must_use]
    pub fn content(&self) -> &ContentRepository {
        &self.inner.content
    }

    /// Entity managers.
    #[must_use]
    pub fn managers(&self) -> &Managers {
        &self.inner.managers
    }

    /// Image uploads.
    #[must_use]
    pub fn uploads(&self) -> &UploadService {
        &self.inner.uploads
    }
}
