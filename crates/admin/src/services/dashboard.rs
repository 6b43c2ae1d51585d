//! Dashboard statistics.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use garuda_core::{BackgroundCheckStatus, CurrencyCode, Money, VolunteerStatus};

use super::entities::{EntityError, Managers};

/// Record counts and donation totals shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub programs: i64,
    pub stories: i64,
    pub gallery_items: i64,
    pub events: i64,
    pub donations: i64,
    pub volunteers: i64,
    /// Sum of completed donations, one entry per currency received.
    pub donation_totals: Vec<Money>,
    pub active_volunteers: usize,
    pub approved_volunteers: usize,
}

impl DashboardStats {
    /// Gather statistics from every manager.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::Store` if any store fails.
    pub async fn gather(managers: &Managers) -> Result<Self, EntityError> {
        let (programs, stories, gallery_items, events) = tokio::try_join!(
            managers.programs.count(),
            managers.stories.count(),
            managers.gallery.count(),
            managers.events.count(),
        )?;
        let (donations, volunteers) =
            tokio::try_join!(managers.donations.list(), managers.volunteers.list())?;

        let mut totals: BTreeMap<CurrencyCode, Decimal> = BTreeMap::new();
        for donation in donations.iter().filter(|d| d.is_completed()) {
            *totals.entry(donation.fields.currency).or_default() += donation.fields.amount;
        }

        Ok(Self {
            programs,
            stories,
            gallery_items,
            events,
            donations: i64::try_from(donations.len()).unwrap_or(i64::MAX),
            volunteers: i64::try_from(volunteers.len()).unwrap_or(i64::MAX),
            donation_totals: totals
                .into_iter()
                .map(|(currency, amount)| Money::new(amount, currency))
                .collect(),
            active_volunteers: volunteers
                .iter()
                .filter(|v| v.fields.status == VolunteerStatus::Active)
                .count(),
            approved_volunteers: volunteers
                .iter()
                .filter(|v| v.fields.background_check_status == BackgroundCheckStatus::Approved)
                .count(),
        })
    }
}
