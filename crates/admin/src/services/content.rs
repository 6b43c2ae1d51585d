//! Content repository: keyed read/write access to `website_content`.
//!
//! Reads are public. Writes need a signed-in admin and a payload that fits
//! the section; both checks happen before the store is touched. Concurrent
//! writers to one section are last-write-wins.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument};

use garuda_core::ValidationError;
use garuda_core::content::{SectionContent, SectionName, validate_payload};

use crate::db::{RepositoryError, SectionStore};
use crate::models::{ContentSection, CurrentAdmin};

/// Errors from content operations.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Write attempted without a signed-in admin.
    #[error("authentication required")]
    AuthRequired,

    /// Section name or payload failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store could not be reached or rejected the statement.
    #[error("content store error: {0}")]
    Store(#[from] RepositoryError),
}

/// Read/write access to website content sections.
#[derive(Clone)]
pub struct ContentRepository {
    store: Arc<dyn SectionStore>,
}

impl ContentRepository {
    /// Create a repository over a section store.
    #[must_use]
    pub fn new(store: Arc<dyn SectionStore>) -> Self {
        Self { store }
    }

    /// Fetch one section; `None` when it has never been written.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Store` on storage failure.
    pub async fn fetch_section(
        &self,
        name: &SectionName,
    ) -> Result<Option<ContentSection>, ContentError> {
        Ok(self.store.fetch(name).await?)
    }

    /// Validate and upsert a section payload as `actor`.
    ///
    /// Returns the row as written.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::AuthRequired` when `actor` is `None` and
    /// `ContentError::Validation` for a payload that does not fit the
    /// section. Neither case touches the store.
    #[instrument(skip(self, actor, payload), fields(section = %name))]
    pub async fn update_section(
        &self,
        actor: Option<&CurrentAdmin>,
        name: &SectionName,
        payload: &Value,
    ) -> Result<ContentSection, ContentError> {
        let actor = actor.ok_or(ContentError::AuthRequired)?;
        validate_payload(name, payload)?;

        let row = self.store.upsert(name, payload, Some(actor.id)).await?;
        info!(admin_id = %actor.id, "content section updated");
        Ok(row)
    }

    /// All stored sections, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Store` on storage failure.
    pub async fn list_sections(&self) -> Result<Vec<ContentSection>, ContentError> {
        Ok(self.store.list().await?)
    }

    /// Fetch and decode a typed section.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Validation` if the stored payload no longer
    /// fits the section's shape.
    pub async fn fetch<S: SectionContent>(&self) -> Result<Option<S>, ContentError> {
        match self.fetch_section(&S::section_name()).await? {
            Some(row) => Ok(Some(S::from_payload(&row.content)?)),
            None => Ok(None),
        }
    }

    /// Fetch a typed section, falling back to its default when absent.
    ///
    /// # Errors
    ///
    /// See [`ContentRepository::fetch`].
    pub async fn fetch_or_default<S: SectionContent>(&self) -> Result<S, ContentError> {
        Ok(self.fetch::<S>().await?.unwrap_or_default())
    }

    /// Validate and store a typed section as `actor`.
    ///
    /// # Errors
    ///
    /// See [`ContentRepository::update_section`].
    pub async fn update<S: SectionContent>(
        &self,
        actor: Option<&CurrentAdmin>,
        content: &S,
    ) -> Result<ContentSection, ContentError> {
        let payload = serde_json::to_value(content).map_err(|e| ValidationError::Shape {
            section: S::NAME.to_string(),
            reason: e.to_string(),
        })?;
        self.update_section(actor, &S::section_name(), &payload).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use garuda_core::content::{HeroContent, StatsContent};
    use garuda_core::{AdminRole, AdminUserId, Email};
    use serde_json::json;

    use super::*;
    use crate::db::memory::MemorySectionStore;

    fn admin() -> CurrentAdmin {
        CurrentAdmin {
            id: AdminUserId::generate(),
            email: Email::parse("editor@example.org").unwrap(),
            full_name: "Content Editor".to_string(),
            role: AdminRole::Editor,
            login_time: Utc::now(),
        }
    }

    fn repo() -> (ContentRepository, Arc<MemorySectionStore>) {
        let store = Arc::new(MemorySectionStore::new());
        (ContentRepository::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_update_records_actor() {
        let (repo, _) = repo();
        let admin = admin();
        let name = SectionName::parse("announcements").unwrap();
        let row = repo
            .update_section(Some(&admin), &name, &json!({"text": "Diwali seva drive"}))
            .await
            .unwrap();

        assert_eq!(row.last_updated_by, Some(admin.id));
    }

    #[tokio::test]
    async fn test_invalid_payload_never_reaches_store() {
        let (repo, store) = repo();
        let result = repo
            .update_section(
                Some(&admin()),
                &HeroContent::section_name(),
                &json!({"title": ""}),
            )
            .await;

        assert!(matches!(result, Err(ContentError::Validation(_))));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_typed_round_trip_and_default() {
        let (repo, _) = repo();
        assert_eq!(
            repo.fetch_or_default::<StatsContent>().await.unwrap(),
            StatsContent::default()
        );

        let stats = StatsContent {
            villages: 140,
            ..StatsContent::default()
        };
        repo.update(Some(&admin()), &stats).await.unwrap();
        assert_eq!(repo.fetch::<StatsContent>().await.unwrap(), Some(stats));
    }
}
