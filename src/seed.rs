//! First-run seeding so a fresh device never shows an empty log.

use chrono::Utc;

use crate::id::IdSource;
use crate::models::{Brew, Drink, PressurePhase};
use crate::store::{RecordStore, StoreError};

/// Which collections `ensure_seeded` populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub brews_seeded: bool,
    pub drinks_seeded: bool,
}

/// Inserts one example record into each empty collection.
///
/// The two checks are independent: a device that kept its brews but
/// deleted every drink gets only a drink back, and vice versa. Safe to
/// call on every startup.
pub fn ensure_seeded(
    brews: &RecordStore<Brew>,
    drinks: &RecordStore<Drink>,
    ids: &IdSource,
) -> Result<SeedReport, StoreError> {
    let mut report = SeedReport::default();

    if brews.list().is_empty() {
        tracing::info!("Seeding default brew");
        let brew = Brew::new(ids.next_id(), PressurePhase::new("9", "36"))
            .with_bean_name("Brasilien")
            .with_roast_date(Utc::now().date_naive())
            .with_grind_size("14.5")
            .with_rpm("1000")
            .with_dose("18")
            .with_ratio("2.5");
        brews.create(&brew)?;
        report.brews_seeded = true;
    }

    if drinks.list().is_empty() {
        tracing::info!("Seeding default drink");
        let drink = Drink::new(ids.next_id(), "Cappuccino")
            .with_description("Double shot of Brasilien espresso with micro-textured milk.");
        drinks.create(&drink)?;
        report.drinks_seeded = true;
    }

    Ok(report)
}
