//! Programs: the foundation's ongoing work areas.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use garuda_core::types::validation::{check_amount, require};
use garuda_core::{AdminUserId, ProgramCategory, ProgramId, ProgramStatus, ValidationError};

use super::Entity;

/// `programs.budget_*` are `NUMERIC(14, 2)`.
const BUDGET_INTEGER_DIGITS: u32 = 12;

/// Editable program fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramFields {
    #[serde(default)]
    pub title: String,
    pub category: ProgramCategory,
    pub description: Option<String>,
    pub detailed_description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: ProgramStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub beneficiaries_count: Option<i32>,
    pub budget_allocated: Option<Decimal>,
    pub budget_spent: Option<Decimal>,
}

/// A stored program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    pub id: ProgramId,
    #[serde(flatten)]
    pub fields: ProgramFields,
    pub created_by: Option<AdminUserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Program {
    type Id = ProgramId;
    type Fields = ProgramFields;

    const COLLECTION: &'static str = "programs";
    const NOUN: &'static str = "program";

    fn id(&self) -> ProgramId {
        self.id
    }

    fn validate(fields: &ProgramFields) -> Result<(), ValidationError> {
        require("title", &fields.title)?;

        if let (Some(start), Some(end)) = (fields.start_date, fields.end_date)
            && end < start
        {
            return Err(ValidationError::invalid("end_date", "must not be before start_date"));
        }

        if fields.beneficiaries_count.is_some_and(|n| n < 0) {
            return Err(ValidationError::invalid("beneficiaries_count", "must not be negative"));
        }

        for (field, amount) in [
            ("budget_allocated", fields.budget_allocated),
            ("budget_spent", fields.budget_spent),
        ] {
            if let Some(amount) = amount {
                if amount.is_sign_negative() {
                    return Err(ValidationError::invalid(field, "must not be negative"));
                }
                check_amount(field, amount, BUDGET_INTEGER_DIGITS)?;
            }
        }

        Ok(())
    }

    fn assemble(id: ProgramId, fields: ProgramFields, actor: AdminUserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            fields,
            created_by: Some(actor),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, fields: ProgramFields, now: DateTime<Utc>) {
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

    fn fields() -> ProgramFields {
        serde_json::from_value(serde_json::json!({
            "title": "Goshala care",
            "category": "goshala",
        }))
        .unwrap()
    }

    #[test]
    fn test_minimal_program_is_valid() {
        let fields = fields();
        assert_eq!(fields.status, ProgramStatus::Active);
        assert!(Program::validate(&fields).is_ok());
    }

    #[test]
    fn test_title_required() {
        let mut fields = fields();
        fields.title = " ".to_string();
        assert_eq!(
            Program::validate(&fields),
            Err(ValidationError::Required { field: "title" })
        );
    }

    #[test]
    fn test_dates_ordered() {
        let mut fields = fields();
        fields.start_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        fields.end_date = NaiveDate::from_ymd_opt(2026, 2, 1);
        assert!(Program::validate(&fields).is_err());
    }

    #[test]
    fn test_negative_budget_rejected() {
        let mut fields = fields();
        fields.budget_spent = Some(Decimal::new(-1, 0));
        assert!(Program::validate(&fields).is_err());
    }

    #[test]
    fn test_budget_must_fit_column() {
        let mut fields = fields();
        fields.budget_allocated = Some(Decimal::new(1, 3));
        assert!(matches!(
            Program::validate(&fields),
            Err(ValidationError::Invalid { field: "budget_allocated", .. })
        ));

        fields.budget_allocated = Some(Decimal::new(250_000, 0));
        fields.budget_spent = Some(Decimal::from(1_000_000_000_000_i64));
        assert!(matches!(
            Program::validate(&fields),
            Err(ValidationError::Invalid { field: "budget_spent", .. })
        ));
    }
}
