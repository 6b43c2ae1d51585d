//! Gallery items.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use garuda_core::types::validation::require;
use garuda_core::{AdminUserId, GalleryCategory, GalleryItemId, ValidationError};

use super::Entity;

const fn default_category() -> GalleryCategory {
    GalleryCategory::General
}

/// Editable gallery item fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryFields {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "default_category")]
    pub category: GalleryCategory,
    pub location: Option<String>,
    pub date_taken: Option<NaiveDate>,
    pub photographer: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

/// A stored gallery item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryItem {
    pub id: GalleryItemId,
    #[serde(flatten)]
    pub fields: GalleryFields,
    pub uploaded_by: Option<AdminUserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for GalleryItem {
    type Id = GalleryItemId;
    type Fields = GalleryFields;

    const COLLECTION: &'static str = "gallery";
    const NOUN: &'static str = "gallery item";

    fn id(&self) -> GalleryItemId {
        self.id
    }

    fn validate(fields: &GalleryFields) -> Result<(), ValidationError> {
        require("title", &fields.title)?;
        require("image_url", &fields.image_url)
    }

    fn assemble(
        id: GalleryItemId,
        fields: GalleryFields,
        actor: AdminUserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            fields,
            uploaded_by: Some(actor),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, fields: GalleryFields, now: DateTime<Utc>) {
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
    use super::*;

    #[test]
    fn test_image_required() {
        let fields: GalleryFields =
            serde_json::from_value(serde_json::json!({ "title": "Gau seva" })).unwrap();
        assert_eq!(fields.category, GalleryCategory::General);
        assert_eq!(
            GalleryItem::validate(&fields),
            Err(ValidationError::Required { field: "image_url" })
        );
    }
}
