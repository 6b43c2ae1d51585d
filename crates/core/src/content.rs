//! Website content sections.
//!
//! The `website_content` table is a key-value store: one row per
//! [`SectionName`], each holding a JSON payload. The four sections the public
//! site renders have typed shapes (`hero`, `mission`, `stats`, `contact`)
//! checked on every write by [`validate_payload`]. Any other well-formed name
//! is an open section whose payload only has to be a JSON object.
//!
//! # Example
//!
//! ```
//! use garuda_core::content::{SectionContent, SectionName, StatsContent, validate_payload};
//!
//! let name = SectionName::parse("stats").unwrap();
//! assert_eq!(name, StatsContent::section_name());
//!
//! let ok = serde_json::json!({ "villages": 120, "women_skilled": 2400 });
//! assert!(validate_payload(&name, &ok).is_ok());
//!
//! let bad = serde_json::json!({ "villages": "lots" });
//! assert!(validate_payload(&name, &bad).is_err());
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Email;
use crate::types::validation::ValidationError;

/// A validated `website_content` key.
///
/// Lowercase ASCII letters, digits, `_` and `-`, starting with a letter,
/// at most [`SectionName::MAX_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionName(Cow<'static, str>);

impl SectionName {
    /// Maximum length of a section name.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a section name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Invalid`] for empty, overlong or
    /// non-slug names.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "section_name",
            });
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(ValidationError::invalid(
                "section_name",
                format!("must be at most {} characters", Self::MAX_LENGTH),
            ));
        }
        if !s.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(ValidationError::invalid(
                "section_name",
                "must start with a lowercase letter",
            ));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(ValidationError::invalid(
                "section_name",
                "may only contain a-z, 0-9, '_' and '-'",
            ));
        }
        Ok(Self(Cow::Owned(s.to_owned())))
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this name has a typed shape.
    #[must_use]
    pub fn is_typed(&self) -> bool {
        TYPED_SECTIONS.contains(&self.as_str())
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SectionName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SectionName> for String {
    fn from(name: SectionName) -> Self {
        name.0.into_owned()
    }
}

impl std::str::FromStr for SectionName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A typed website content section.
///
/// Decoding is strict: unknown fields are rejected, missing fields decode as
/// empty strings or zero, and [`SectionContent::validate`] decides which of those
/// are required.
pub trait SectionContent:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    /// The `section_name` this shape is stored under.
    const NAME: &'static str;

    /// Check field-level rules after decoding.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    fn validate(&self) -> Result<(), ValidationError>;

    /// The key this section is stored under.
    #[must_use]
    fn section_name() -> SectionName {
        SectionName(Cow::Borrowed(Self::NAME))
    }

    /// Decode and validate a stored payload.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Shape`] when the JSON does not decode and
    /// any field-level error from [`SectionContent::validate`].
    fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let content = Self::deserialize(payload).map_err(|e| ValidationError::Shape {
            section: Self::NAME.to_owned(),
            reason: e.to_string(),
        })?;
        content.validate()?;
        Ok(content)
    }
}

const TYPED_SECTIONS: [&str; 4] = [
    HeroContent::NAME,
    MissionContent::NAME,
    StatsContent::NAME,
    ContactContent::NAME,
];

/// Validate a payload against the rules for `name`.
///
/// # Errors
///
/// Returns a [`ValidationError`] when a typed section fails to decode or
/// validate, or when an open section's payload is not a JSON object.
pub fn validate_payload(name: &SectionName, payload: &Value) -> Result<(), ValidationError> {
    match name.as_str() {
        HeroContent::NAME => HeroContent::from_payload(payload).map(drop),
        MissionContent::NAME => MissionContent::from_payload(payload).map(drop),
        StatsContent::NAME => StatsContent::from_payload(payload).map(drop),
        ContactContent::NAME => ContactContent::from_payload(payload).map(drop),
        _ if payload.is_object() => Ok(()),
        other => Err(ValidationError::Shape {
            section: other.to_owned(),
            reason: "payload must be a JSON object".to_owned(),
        }),
    }
}

/// Landing banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeroContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub cta_primary: String,
    #[serde(default)]
    pub cta_secondary: String,
}

impl Default for HeroContent {
    fn default() -> Self {
        Self {
            title: "Reviving the Soul of Bharat".to_owned(),
            subtitle: "Restoring India's spiritual heritage, empowering villages through \
                       culture and self-sufficiency. True transformation begins within our roots."
                .to_owned(),
            cta_primary: "Join the Movement".to_owned(),
            cta_secondary: "Donate Now".to_owned(),
        }
    }
}

impl SectionContent for HeroContent {
    const NAME: &'static str = "hero";

    fn validate(&self) -> Result<(), ValidationError> {
        crate::types::validation::require("title", &self.title)
    }
}

/// Mission, vision and philosophy statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MissionContent {
    #[serde(default)]
    pub mission_text: String,
    #[serde(default)]
    pub vision: String,
    #[serde(default)]
    pub philosophy: String,
}

impl Default for MissionContent {
    fn default() -> Self {
        Self {
            mission_text: "To empower India through its roots: culture, women, sustainability. \
                           We enable rural transformation by honoring ancient wisdom while \
                           building pathways to modern prosperity."
                .to_owned(),
            vision: "A self-reliant Bharat where ancient wisdom uplifts modern life, one \
                     village, one temple, one woman at a time."
                .to_owned(),
            philosophy: "Transformation begins from within villages, not from the top down. \
                         Local wisdom, collective action and cultural roots form the \
                         foundation of lasting change."
                .to_owned(),
        }
    }
}

impl SectionContent for MissionContent {
    const NAME: &'static str = "mission";

    fn validate(&self) -> Result<(), ValidationError> {
        let all_blank = [&self.mission_text, &self.vision, &self.philosophy]
            .iter()
            .all(|s| s.trim().is_empty());
        if all_blank {
            return Err(ValidationError::Required {
                field: "mission_text",
            });
        }
        Ok(())
    }
}

/// Impact counters shown on the home page.
///
/// Defaults are the placeholders rendered while no row exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsContent {
    #[serde(default)]
    pub villages: u32,
    #[serde(default)]
    pub women_skilled: u32,
    #[serde(default)]
    pub temples_revived: u32,
    #[serde(default)]
    pub programs_active: u32,
}

impl Default for StatsContent {
    fn default() -> Self {
        Self {
            villages: 100,
            women_skilled: 2000,
            temples_revived: 20,
            programs_active: 5,
        }
    }
}

impl StatsContent {
    /// Counters as `(label, "N+")` pairs in display order.
    #[must_use]
    pub fn display_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("Villages Reached", format!("{}+", self.villages)),
            ("Women Skilled", format!("{}+", self.women_skilled)),
            ("Temples Revived", format!("{}+", self.temples_revived)),
            ("Active Programs", format!("{}+", self.programs_active)),
        ]
    }
}

impl SectionContent for StatsContent {
    const NAME: &'static str = "stats";

    fn validate(&self) -> Result<(), ValidationError> {
        // u32 decoding already rejects negatives and fractions
        Ok(())
    }
}

/// Footer contact block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactContent {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub office_hours: String,
}

impl Default for ContactContent {
    fn default() -> Self {
        Self {
            email: "hello@garudadhruvam.org".to_owned(),
            phone: "+91 98765 43210".to_owned(),
            address: "India".to_owned(),
            office_hours: "Mon-Sat, 10:00-18:00 IST".to_owned(),
        }
    }
}

impl SectionContent for ContactContent {
    const NAME: &'static str = "contact";

    fn validate(&self) -> Result<(), ValidationError> {
        if !self.email.trim().is_empty() {
            Email::parse(&self.email).map_err(|e| ValidationError::invalid("email", e.to_string()))?;
        }
        Ok(())
    }
}

/// Default payloads for every typed section, for seeding an empty store.
///
/// # Errors
///
/// Returns an error only if a default fails to serialize.
pub fn default_sections() -> Result<Vec<(SectionName, Value)>, serde_json::Error> {
    Ok(vec![
        (HeroContent::section_name(), serde_json::to_value(HeroContent::default())?),
        (MissionContent::section_name(), serde_json::to_value(MissionContent::default())?),
        (StatsContent::section_name(), serde_json::to_value(StatsContent::default())?),
        (ContactContent::section_name(), serde_json::to_value(ContactContent::default())?),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_section_name_accepts_slugs() {
        for name in ["hero", "stats", "home_banner", "faq-2026"] {
            assert_eq!(SectionName::parse(name).unwrap().as_str(), name);
        }
    }

    #[test]
    fn test_section_name_rejects_bad_input() {
        assert!(SectionName::parse("").is_err());
        assert!(SectionName::parse("Hero").is_err());
        assert!(SectionName::parse("9lives").is_err());
        assert!(SectionName::parse("has space").is_err());
        assert!(SectionName::parse(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_typed_names_match_constants() {
        assert!(HeroContent::section_name().is_typed());
        assert!(!SectionName::parse("faq").unwrap().is_typed());
        assert_eq!(
            SectionName::parse("contact").unwrap(),
            ContactContent::section_name()
        );
    }

    #[test]
    fn test_hero_requires_title() {
        let name = HeroContent::section_name();
        let err = validate_payload(&name, &json!({ "title": "  ", "subtitle": "x" })).unwrap_err();
        assert_eq!(err, ValidationError::Required { field: "title" });
    }

    #[test]
    fn test_hero_rejects_unknown_fields() {
        let name = HeroContent::section_name();
        let err = validate_payload(&name, &json!({ "title": "A", "titel": "typo" })).unwrap_err();
        assert!(matches!(err, ValidationError::Shape { .. }));
    }

    #[test]
    fn test_stats_rejects_non_numbers_and_negatives() {
        let name = StatsContent::section_name();
        assert!(validate_payload(&name, &json!({ "villages": "many" })).is_err());
        assert!(validate_payload(&name, &json!({ "villages": -1 })).is_err());
        assert!(validate_payload(&name, &json!({ "villages": 150 })).is_ok());
    }

    #[test]
    fn test_stats_placeholders() {
        let pairs = StatsContent::default().display_pairs();
        assert_eq!(pairs[0], ("Villages Reached", "100+".to_owned()));
        assert_eq!(pairs[1].1, "2000+");
        assert_eq!(pairs[2].1, "20+");
    }

    #[test]
    fn test_mission_needs_some_text() {
        let name = MissionContent::section_name();
        assert!(validate_payload(&name, &json!({})).is_err());
        assert!(validate_payload(&name, &json!({ "vision": "A self-reliant Bharat" })).is_ok());
    }

    #[test]
    fn test_contact_email_checked_when_present() {
        let name = ContactContent::section_name();
        assert!(validate_payload(&name, &json!({ "email": "not-an-email" })).is_err());
        assert!(validate_payload(&name, &json!({ "email": "", "phone": "+91" })).is_ok());
    }

    #[test]
    fn test_open_sections_need_objects() {
        let name = SectionName::parse("faq").unwrap();
        assert!(validate_payload(&name, &json!({ "items": [1, 2] })).is_ok());
        assert!(validate_payload(&name, &json!(["not", "an", "object"])).is_err());
        assert!(validate_payload(&name, &json!("text")).is_err());
    }

    #[test]
    fn test_defaults_are_valid() {
        for (name, payload) in default_sections().unwrap() {
            validate_payload(&name, &payload).unwrap();
        }
    }
}
