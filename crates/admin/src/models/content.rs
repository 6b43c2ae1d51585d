//! Stored website content rows.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use garuda_core::content::SectionName;
use garuda_core::{AdminUserId, ContentSectionId};

/// One `website_content` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentSection {
    pub id: ContentSectionId,
    pub section_name: SectionName,
    pub content: Value,
    pub last_updated_by: Option<AdminUserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
