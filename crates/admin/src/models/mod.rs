//! Domain models for the admin dashboard.
//!
//! Each managed record kind implements [`Entity`]: a stored record type
//! (`Program`) paired with the editable field set clients submit
//! (`ProgramFields`). Field sets are validated before any store call; the
//! record adds the generated id, creator and timestamps.

pub mod admin_user;
pub mod content;
pub mod donation;
pub mod event;
pub mod gallery;
pub mod program;
pub mod session;
pub mod story;
pub mod volunteer;

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use garuda_core::{AdminUserId, ValidationError};

pub use admin_user::AdminUser;
pub use content::ContentSection;
pub use donation::{Donation, DonationFields};
pub use event::{Event, EventFields};
pub use gallery::{GalleryFields, GalleryItem};
pub use program::{Program, ProgramFields};
pub use session::CurrentAdmin;
pub use story::{Story, StoryFields};
pub use volunteer::{Volunteer, VolunteerFields};

/// A record kind managed through the dashboard.
pub trait Entity: Clone + Debug + Serialize + Send + Sync + 'static {
    /// Typed identifier.
    type Id: Copy
        + Eq
        + Hash
        + Debug
        + Display
        + Serialize
        + DeserializeOwned
        + From<Uuid>
        + Send
        + Sync
        + 'static;

    /// Client-editable fields.
    type Fields: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Table name and API path segment, e.g. `"donations"`.
    const COLLECTION: &'static str;

    /// Singular noun for logs and messages.
    const NOUN: &'static str;

    /// This record's id.
    fn id(&self) -> Self::Id;

    /// Check required fields and value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    fn validate(fields: &Self::Fields) -> Result<(), ValidationError>;

    /// Build a new record from validated fields.
    fn assemble(
        id: Self::Id,
        fields: Self::Fields,
        actor: AdminUserId,
        now: DateTime<Utc>,
    ) -> Self;

    /// Overwrite the editable fields of an existing record.
    fn apply(&mut self, fields: Self::Fields, now: DateTime<Utc>);

    /// Listing order: newest first unless the kind says otherwise.
    fn list_order(a: &Self, b: &Self) -> Ordering;

    /// A value no two records may share, normalized the way the table's
    /// unique constraint compares it, with a label for the conflict message.
    fn unique_key(&self) -> Option<(&'static str, String)> {
        None
    }
}

/// Trim an optional text field, mapping blank to `None`.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Validate an optional email-shaped field.
pub(crate) fn check_optional_email(
    field: &'static str,
    value: Option<&str>,
) -> Result<(), ValidationError> {
    if let Some(email) = non_blank(value) {
        garuda_core::Email::parse(email)
            .map_err(|e| ValidationError::invalid(field, e.to_string()))?;
    }
    Ok(())
}
