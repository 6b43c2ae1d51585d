//! Volunteer registrations.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use garuda_core::types::validation::require;
use garuda_core::{
    AdminUserId, BackgroundCheckStatus, Email, ExperienceLevel, ValidationError, VolunteerId,
    VolunteerStatus,
};

use super::Entity;

/// Editable volunteer fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerFields {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "comma_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "comma_list")]
    pub interests: Vec<String>,
    pub availability: Option<String>,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub background_check_status: BackgroundCheckStatus,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    #[serde(default)]
    pub status: VolunteerStatus,
    pub joined_date: Option<NaiveDate>,
}

/// Accept either `["a", "b"]` or `"a, b"`; trims entries and drops blanks.
fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrText {
        List(Vec<String>),
        Text(String),
    }

    let items = match Option::<ListOrText>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(ListOrText::List(items)) => items,
        Some(ListOrText::Text(text)) => text.split(',').map(str::to_owned).collect(),
    };

    Ok(items
        .into_iter()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect())
}

/// A stored volunteer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Volunteer {
    pub id: VolunteerId,
    #[serde(flatten)]
    pub fields: VolunteerFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Volunteer {
    type Id = VolunteerId;
    type Fields = VolunteerFields;

    const COLLECTION: &'static str = "volunteers";
    const NOUN: &'static str = "volunteer";

    fn id(&self) -> VolunteerId {
        self.id
    }

    fn validate(fields: &VolunteerFields) -> Result<(), ValidationError> {
        require("full_name", &fields.full_name)?;
        require("email", &fields.email)?;
        Email::parse(&fields.email).map_err(|e| ValidationError::invalid("email", e.to_string()))?;
        Ok(())
    }

    fn assemble(id: VolunteerId, fields: VolunteerFields, _actor: AdminUserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, fields: VolunteerFields, now: DateTime<Utc>) {
        self.fields = fields;
        self.updated_at = now;
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }

    fn unique_key(&self) -> Option<(&'static str, String)> {
        Some(("volunteer email", self.fields.email.trim().to_lowercase()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_accept_comma_text() {
        let fields: VolunteerFields = serde_json::from_value(serde_json::json!({
            "full_name": "Arjun",
            "email": "arjun@example.in",
            "skills": "teaching, carpentry , ,first aid",
            "interests": ["goshala"],
        }))
        .unwrap();
        assert_eq!(fields.skills, vec!["teaching", "carpentry", "first aid"]);
        assert_eq!(fields.interests, vec!["goshala"]);
        assert!(Volunteer::validate(&fields).is_ok());
    }

    #[test]
    fn test_email_required_and_checked() {
        let mut fields: VolunteerFields =
            serde_json::from_value(serde_json::json!({ "full_name": "Arjun" })).unwrap();
        assert_eq!(
            Volunteer::validate(&fields),
            Err(ValidationError::Required { field: "email" })
        );
        fields.email = "arjun".to_string();
        assert!(Volunteer::validate(&fields).is_err());
    }
}
