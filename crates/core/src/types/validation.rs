//! Field-level validation failures.

use rust_decimal::Decimal;

/// A record or content payload failed validation.
///
/// Validation always runs before any store call, so a `ValidationError`
/// guarantees nothing was written.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required {
        /// Field name as it appears in the payload.
        field: &'static str,
    },
    /// A numeric field must be greater than zero.
    #[error("{field} must be greater than zero")]
    NotPositive {
        /// Field name as it appears in the payload.
        field: &'static str,
    },
    /// A field holds a value outside its allowed form.
    #[error("{field}: {reason}")]
    Invalid {
        /// Field name as it appears in the payload.
        field: &'static str,
        /// What was wrong.
        reason: String,
    },
    /// The payload does not have the shape expected for its section.
    #[error("invalid payload for section {section}: {reason}")]
    Shape {
        /// Section the payload was written to.
        section: String,
        /// Decoder or structural error.
        reason: String,
    },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Invalid`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Fail with [`ValidationError::Required`] when `value` is blank.
///
/// # Errors
///
/// Returns `Required` if the trimmed value is empty.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(())
    }
}

/// Fail unless `value` fits a `NUMERIC(_, 2)` column with `integer_digits`
/// digits before the decimal point.
///
/// # Errors
///
/// Returns `Invalid` for sub-paisa precision or an out-of-range magnitude.
pub fn check_amount(
    field: &'static str,
    value: Decimal,
    integer_digits: u32,
) -> Result<(), ValidationError> {
    if value.normalize().scale() > 2 {
        return Err(ValidationError::invalid(
            field,
            "must not have more than two decimal places",
        ));
    }
    let limit = Decimal::from(10_i64.pow(integer_digits));
    if value.abs() >= limit {
        return Err(ValidationError::invalid(
            field,
            format!("must be less than {limit}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_blank() {
        assert_eq!(
            require("title", "  \t"),
            Err(ValidationError::Required { field: "title" })
        );
        assert!(require("title", "Temple renovation").is_ok());
    }

    #[test]
    fn test_check_amount_matches_column() {
        assert!(check_amount("amount", Decimal::new(150_050, 2), 12).is_ok());
        assert!(check_amount("amount", Decimal::new(1_500, 3), 12).is_ok());
        assert!(check_amount("amount", Decimal::new(999_999_999_999_99, 2), 12).is_ok());

        assert!(matches!(
            check_amount("amount", Decimal::new(4, 3), 12),
            Err(ValidationError::Invalid { field: "amount", .. })
        ));
        assert!(matches!(
            check_amount("amount", Decimal::from(10_000_000_000_000_i64), 12),
            Err(ValidationError::Invalid { field: "amount", .. })
        ));
        assert!(check_amount("registration_fee", Decimal::from(10_000_000_000_i64), 10).is_err());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::NotPositive { field: "amount" }.to_string(),
            "amount must be greater than zero"
        );
        assert_eq!(
            ValidationError::invalid("end_date", "before event_date").to_string(),
            "end_date: before event_date"
        );
    }
}
