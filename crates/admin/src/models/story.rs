//! Stories: impact stories, blog posts, news and testimonials.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use garuda_core::types::validation::require;
use garuda_core::{AdminUserId, StoryCategory, StoryId, StoryStatus, ValidationError};

use super::Entity;

const fn default_read_time() -> i32 {
    5
}

/// Editable story fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryFields {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub excerpt: Option<String>,
    pub category: StoryCategory,
    pub featured_image_url: Option<String>,
    #[serde(default)]
    pub status: StoryStatus,
    pub author_name: Option<String>,
    pub author_role: Option<String>,
    #[serde(default = "default_read_time")]
    pub read_time_minutes: i32,
    #[serde(default)]
    pub is_featured: bool,
}

/// A stored story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Story {
    pub id: StoryId,
    #[serde(flatten)]
    pub fields: StoryFields,
    pub published_at: Option<DateTime<Utc>>,
    pub created_by: Option<AdminUserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `published_at` after a write with `status`.
///
/// Set on the first transition into published, kept while the story stays
/// published, cleared when it leaves.
#[must_use]
pub fn published_at_after(
    status: StoryStatus,
    previous: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match status {
        StoryStatus::Published => previous.or(Some(now)),
        StoryStatus::Draft | StoryStatus::Archived => None,
    }
}

impl Entity for Story {
    type Id = StoryId;
    type Fields = StoryFields;

    const COLLECTION: &'static str = "stories";
    const NOUN: &'static str = "story";

    fn id(&self) -> StoryId {
        self.id
    }

    fn validate(fields: &StoryFields) -> Result<(), ValidationError> {
        require("title", &fields.title)?;
        require("content", &fields.content)?;
        if fields.read_time_minutes < 1 {
            return Err(ValidationError::NotPositive {
                field: "read_time_minutes",
            });
        }
        Ok(())
    }

    fn assemble(id: StoryId, fields: StoryFields, actor: AdminUserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            published_at: published_at_after(fields.status, None, now),
            fields,
            created_by: Some(actor),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, fields: StoryFields, now: DateTime<Utc>) {
        self.published_at = published_at_after(fields.status, self.published_at, now);
        self.fields = fields;
        self.updated_at = now;
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn fields(status: &str) -> StoryFields {
        serde_json::from_value(serde_json::json!({
            "title": "A temple lamp relit",
            "content": "After forty years the village gathered again.",
            "category": "impact_story",
            "status": status,
        }))
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let fields = fields("draft");
        assert_eq!(fields.read_time_minutes, 5);
        assert!(!fields.is_featured);
    }

    #[test]
    fn test_content_required() {
        let mut fields = fields("draft");
        fields.content.clear();
        assert_eq!(
            Story::validate(&fields),
            Err(ValidationError::Required { field: "content" })
        );
    }

    #[test]
    fn test_publishing_sets_and_keeps_timestamp() {
        let now = Utc::now();
        let mut story = Story::assemble(StoryId::generate(), fields("draft"), AdminUserId::generate(), now);
        assert_eq!(story.published_at, None);

        story.apply(fields("published"), now);
        assert_eq!(story.published_at, Some(now));

        story.apply(fields("published"), now + Duration::hours(1));
        assert_eq!(story.published_at, Some(now));

        story.apply(fields("archived"), now + Duration::hours(2));
        assert_eq!(story.published_at, None);
    }
}
