//! Application state shared across handlers.

use std::sync::Arc;

use crate::content::ContentSource;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    content: Arc<dyn ContentSource>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(content: Arc<dyn ContentSource>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { content }),
        }
    }

    /// Get the website content source.
    #[must_use]
    pub fn content(&self) -> &dyn ContentSource {
        self.inner.content.as_ref()
    }
}
