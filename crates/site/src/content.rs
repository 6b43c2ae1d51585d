//! Read-only access to `website_content`, `stories` and `gallery`.
//!
//! The site never writes content. Each section is looked up by name and
//! decoded into its typed shape; a missing row, an undecodable payload or a
//! database failure all fall back to the section's default so the home page
//! always renders.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{error, warn};

use garuda_core::content::{SectionContent, SectionName};

use crate::showcase::{GalleryTeaser, StoryTeaser};

/// Where section payloads come from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// The stored payload for `name`, or `None` when no row exists.
    async fn section(&self, name: &SectionName) -> Result<Option<Value>, sqlx::Error>;

    /// Up to `limit` published stories, featured first, newest first.
    async fn published_stories(&self, limit: i64) -> Result<Vec<StoryTeaser>, sqlx::Error>;

    /// Up to `limit` gallery images, featured first, newest first.
    async fn gallery_images(&self, limit: i64) -> Result<Vec<GalleryTeaser>, sqlx::Error>;
}

/// `PostgreSQL`-backed [`ContentSource`].
#[derive(Debug, Clone)]
pub struct PgContentSource {
    pool: PgPool,
}

impl PgContentSource {
    /// Create a new content source.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentSource for PgContentSource {
    async fn section(&self, name: &SectionName) -> Result<Option<Value>, sqlx::Error> {
        sqlx::query_scalar::<_, Value>(
            "SELECT content FROM website_content WHERE section_name = $1",
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
    }

    async fn published_stories(&self, limit: i64) -> Result<Vec<StoryTeaser>, sqlx::Error> {
        sqlx::query_as::<_, StoryTeaser>(
            r"
            SELECT title,
                   COALESCE(NULLIF(excerpt, ''), LEFT(content, 160)) AS snippet,
                   read_time_minutes
            FROM stories
            WHERE status = 'published'
            ORDER BY is_featured DESC, published_at DESC NULLS LAST, created_at DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn gallery_images(&self, limit: i64) -> Result<Vec<GalleryTeaser>, sqlx::Error> {
        sqlx::query_as::<_, GalleryTeaser>(
            r"
            SELECT title, image_url, COALESCE(NULLIF(description, ''), title) AS alt
            FROM gallery
            ORDER BY is_featured DESC, created_at DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}

/// Load a typed section, falling back to its default.
pub async fn load_or_default<S: SectionContent>(source: &dyn ContentSource) -> S {
    let name = S::section_name();

    match source.section(&name).await {
        Ok(Some(payload)) => S::from_payload(&payload).unwrap_or_else(|e| {
            warn!(section = %name, error = %e, "Stored content is invalid, using default");
            S::default()
        }),
        Ok(None) => S::default(),
        Err(e) => {
            error!(section = %name, error = %e, "Failed to load content, using default");
            S::default()
        }
    }
}
