//! Events: fundraisers, awareness drives, trainings and celebrations.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use garuda_core::types::validation::{check_amount, require};
use garuda_core::{AdminUserId, EventId, EventStatus, EventType, ValidationError};

use super::{Entity, check_optional_email};

/// `events.registration_fee` is `NUMERIC(12, 2)`.
const FEE_INTEGER_DIGITS: u32 = 10;

/// Editable event fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFields {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub detailed_description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: String,
    pub event_type: EventType,
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: EventStatus,
    pub max_participants: Option<i32>,
    #[serde(default)]
    pub registered_participants: i32,
    pub registration_fee: Option<Decimal>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// A stored event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: EventId,
    #[serde(flatten)]
    pub fields: EventFields,
    pub created_by: Option<AdminUserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Event {
    type Id = EventId;
    type Fields = EventFields;

    const COLLECTION: &'static str = "events";
    const NOUN: &'static str = "event";

    fn id(&self) -> EventId {
        self.id
    }

    fn validate(fields: &EventFields) -> Result<(), ValidationError> {
        require("title", &fields.title)?;
        require("location", &fields.location)?;

        if fields.end_date.is_some_and(|end| end < fields.event_date) {
            return Err(ValidationError::invalid("end_date", "must not be before event_date"));
        }

        if fields.max_participants.is_some_and(|max| max < 1) {
            return Err(ValidationError::NotPositive {
                field: "max_participants",
            });
        }

        if fields.registered_participants < 0 {
            return Err(ValidationError::invalid(
                "registered_participants",
                "must not be negative",
            ));
        }

        if let Some(max) = fields.max_participants
            && fields.registered_participants > max
        {
            return Err(ValidationError::invalid(
                "registered_participants",
                format!("exceeds max_participants ({max})"),
            ));
        }

        if let Some(fee) = fields.registration_fee {
            if fee.is_sign_negative() {
                return Err(ValidationError::invalid("registration_fee", "must not be negative"));
            }
            check_amount("registration_fee", fee, FEE_INTEGER_DIGITS)?;
        }

        check_optional_email("contact_email", fields.contact_email.as_deref())
    }

    fn assemble(id: EventId, fields: EventFields, actor: AdminUserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            fields,
            created_by: Some(actor),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, fields: EventFields, now: DateTime<Utc>) {
        self.fields = fields;
        self.updated_at = now;
    }

    /// Soonest first.
    fn list_order(a: &Self, b: &Self) -> Ordering {
        a.fields.event_date.cmp(&b.fields.event_date)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn fields() -> EventFields {
        serde_json::from_value(serde_json::json!({
            "title": "Deepotsav at Kalyani temple",
            "event_date": "2026-11-01T17:00:00Z",
            "location": "Kalyani",
            "event_type": "celebration",
        }))
        .unwrap()
    }

    #[test]
    fn test_minimal_event_is_valid() {
        let fields = fields();
        assert_eq!(fields.status, EventStatus::Upcoming);
        assert!(Event::validate(&fields).is_ok());
    }

    #[test]
    fn test_location_required() {
        let mut fields = fields();
        fields.location.clear();
        assert_eq!(
            Event::validate(&fields),
            Err(ValidationError::Required { field: "location" })
        );
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut fields = fields();
        fields.end_date = Some(fields.event_date - Duration::hours(1));
        assert!(Event::validate(&fields).is_err());
    }

    #[test]
    fn test_overbooking_rejected() {
        let mut fields = fields();
        fields.max_participants = Some(10);
        fields.registered_participants = 11;
        assert!(Event::validate(&fields).is_err());
    }

    #[test]
    fn test_registration_fee_must_fit_column() {
        let mut fields = fields();
        fields.registration_fee = Some(Decimal::new(99_995, 3));
        assert!(Event::validate(&fields).is_err());

        fields.registration_fee = Some(Decimal::from(10_000_000_000_i64));
        assert!(Event::validate(&fields).is_err());

        fields.registration_fee = Some(Decimal::new(50_000, 2));
        assert!(Event::validate(&fields).is_ok());
    }

    #[test]
    fn test_listing_is_soonest_first() {
        let now = Utc::now();
        let actor = AdminUserId::generate();
        let mut later = fields();
        later.event_date = now + Duration::days(10);
        let mut sooner = fields();
        sooner.event_date = now + Duration::days(1);

        let mut events = vec![
            Event::assemble(EventId::generate(), later, actor, now),
            Event::assemble(EventId::generate(), sooner, actor, now),
        ];
        events.sort_by(Event::list_order);
        assert!(events[0].fields.event_date < events[1].fields.event_date);
    }
}
