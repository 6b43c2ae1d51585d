//! Donations received by the foundation.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use garuda_core::types::validation::{check_amount, require};
use garuda_core::{
    AdminUserId, CurrencyCode, DonationId, DonationPurpose, DonationType, Money, PaymentMethod,
    PaymentStatus, ValidationError,
};

use super::{Entity, check_optional_email};

/// `donations.amount` is `NUMERIC(14, 2)`.
const AMOUNT_INTEGER_DIGITS: u32 = 12;

/// Editable donation fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationFields {
    #[serde(default)]
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub donation_type: DonationType,
    #[serde(default)]
    pub purpose: DonationPurpose,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub receipt_sent: bool,
}

/// A stored donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Donation {
    pub id: DonationId,
    #[serde(flatten)]
    pub fields: DonationFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Donation {
    /// The donated amount in its currency.
    #[must_use]
    pub const fn money(&self) -> Money {
        Money::new(self.fields.amount, self.fields.currency)
    }

    /// Whether this donation counts towards totals.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.fields.payment_status == PaymentStatus::Completed
    }
}

impl Entity for Donation {
    type Id = DonationId;
    type Fields = DonationFields;

    const COLLECTION: &'static str = "donations";
    const NOUN: &'static str = "donation";

    fn id(&self) -> DonationId {
        self.id
    }

    fn validate(fields: &DonationFields) -> Result<(), ValidationError> {
        require("donor_name", &fields.donor_name)?;
        if fields.amount <= Decimal::ZERO {
            return Err(ValidationError::NotPositive { field: "amount" });
        }
        check_amount("amount", fields.amount, AMOUNT_INTEGER_DIGITS)?;
        check_optional_email("donor_email", fields.donor_email.as_deref())
    }

    fn assemble(id: DonationId, fields: DonationFields, _actor: AdminUserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, fields: DonationFields, now: DateTime<Utc>) {
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

    fn fields(json: serde_json::Value) -> DonationFields {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_defaults_follow_rupee_one_time_pending() {
        let fields = fields(serde_json::json!({ "donor_name": "Meera", "amount": "1500" }));
        assert_eq!(fields.currency, CurrencyCode::INR);
        assert_eq!(fields.donation_type, DonationType::OneTime);
        assert_eq!(fields.payment_status, PaymentStatus::Pending);
        assert!(Donation::validate(&fields).is_ok());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let fields = fields(serde_json::json!({ "donor_name": "Meera", "amount": "0" }));
        assert_eq!(
            Donation::validate(&fields),
            Err(ValidationError::NotPositive { field: "amount" })
        );
    }

    #[test]
    fn test_amount_must_fit_column() {
        for amount in ["0.004", "10000000000000"] {
            let fields = fields(serde_json::json!({ "donor_name": "Meera", "amount": amount }));
            assert!(
                matches!(
                    Donation::validate(&fields),
                    Err(ValidationError::Invalid { field: "amount", .. })
                ),
                "{amount} accepted"
            );
        }
        let fields = fields(serde_json::json!({ "donor_name": "Meera", "amount": "0.01" }));
        assert!(Donation::validate(&fields).is_ok());
    }

    #[test]
    fn test_missing_donor_name_rejected() {
        let fields = fields(serde_json::json!({ "amount": "500" }));
        assert_eq!(
            Donation::validate(&fields),
            Err(ValidationError::Required { field: "donor_name" })
        );
    }

    #[test]
    fn test_bad_donor_email_rejected() {
        let fields = fields(serde_json::json!({
            "donor_name": "Meera",
            "amount": "500",
            "donor_email": "meera-at-example",
        }));
        assert!(matches!(
            Donation::validate(&fields),
            Err(ValidationError::Invalid { field: "donor_email", .. })
        ));
    }
}
