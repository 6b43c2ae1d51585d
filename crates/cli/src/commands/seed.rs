//! Seed default website content.
//!
//! Writes the default payload for each typed section (`hero`, `mission`,
//! `stats`, `contact`) only where no row exists, so edits made in the
//! dashboard are never overwritten.

use garuda_admin::db::{PgSectionStore, SectionStore};
use garuda_core::content::default_sections;

use super::connect;

/// Insert default content for sections that have none.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn content() -> Result<(), Box<dyn std::error::Error>> {
    let store = PgSectionStore::new(connect().await?);

    let mut inserted = 0_usize;
    for (name, payload) in default_sections()? {
        if store.insert_if_absent(&name, &payload).await? {
            tracing::info!(section = %name, "Seeded default content");
            inserted += 1;
        } else {
            tracing::info!(section = %name, "Section already has content, skipping");
        }
    }

    tracing::info!(inserted, "Content seeding complete");
    Ok(())
}
