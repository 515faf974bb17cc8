//! Application facade.
//!
//! One `CoffeeLab` is constructed at startup and passed by reference to
//! whatever needs it; nothing reaches for ambient global state.

use crate::config::Config;
use crate::id::IdSource;
use crate::models::{Brew, BrewPatch, Drink, DrinkPatch};
use crate::seed::{ensure_seeded, SeedReport};
use crate::share::{encode_token, EncodeError, ImportGate, ImportOutcome};
use crate::store::{RecordStore, StoreDir, StoreError};

/// The complete local dataset: brew log, drink cards, identity source.
pub struct CoffeeLab {
    brews: RecordStore<Brew>,
    drinks: RecordStore<Drink>,
    ids: IdSource,
}

impl CoffeeLab {
    pub fn open(config: &Config) -> Self {
        Self::with_store_dir(StoreDir::new(config.data_dir.clone()))
    }

    pub fn with_store_dir(dir: StoreDir) -> Self {
        Self {
            brews: RecordStore::new(dir.clone()),
            drinks: RecordStore::new(dir),
            ids: IdSource::new(),
        }
    }

    /// Issues the id for the next record to be created.
    pub fn next_id(&self) -> i64 {
        self.ids.next_id()
    }

    /// Seeds example records into whichever collections are empty.
    pub fn ensure_seeded(&self) -> Result<SeedReport, StoreError> {
        ensure_seeded(&self.brews, &self.drinks, &self.ids)
    }

    pub fn list_brews(&self) -> Vec<Brew> {
        self.brews.list()
    }

    pub fn create_brew(&self, brew: &Brew) -> Result<(), StoreError> {
        self.brews.create(brew)
    }

    pub fn update_brew(&self, id: i64, patch: &BrewPatch) -> Result<bool, StoreError> {
        self.brews.update(id, patch)
    }

    pub fn delete_brew(&self, id: i64) -> Result<bool, StoreError> {
        self.brews.delete(id)
    }

    pub fn list_drinks(&self) -> Vec<Drink> {
        self.drinks.list()
    }

    pub fn create_drink(&self, drink: &Drink) -> Result<(), StoreError> {
        self.drinks.create(drink)
    }

    pub fn update_drink(&self, id: i64, patch: &DrinkPatch) -> Result<bool, StoreError> {
        self.drinks.update(id, patch)
    }

    pub fn delete_drink(&self, id: i64) -> Result<bool, StoreError> {
        self.drinks.delete(id)
    }

    /// Encodes the full dataset into a transfer token.
    pub fn export_token(&self) -> Result<String, EncodeError> {
        encode_token(&self.brews.list(), &self.drinks.list())
    }

    /// Runs the import gate over a pasted link or fragment.
    pub fn import_from_link(
        &self,
        input: &str,
        confirm: impl FnOnce() -> bool,
    ) -> Result<ImportOutcome, StoreError> {
        ImportGate::new(&self.brews, &self.drinks).run(input, confirm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FreshnessBand, PressurePhase};
    use crate::share::share_fragment;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn test_lab() -> (CoffeeLab, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let lab = CoffeeLab::with_store_dir(StoreDir::new(temp_dir.path().to_path_buf()));
        (lab, temp_dir)
    }

    #[test]
    fn test_sequential_creates_get_distinct_ids() {
        let (lab, _temp) = test_lab();

        let first = Brew::new(lab.next_id(), PressurePhase::new("9", "36"));
        let second = Brew::new(lab.next_id(), PressurePhase::new("9", "36"));
        assert_ne!(first.id, second.id);

        lab.create_brew(&first).unwrap();
        lab.create_brew(&second).unwrap();

        let ids: Vec<i64> = lab.list_brews().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn test_update_preserves_id() {
        let (lab, _temp) = test_lab();
        let brew = Brew::new(lab.next_id(), PressurePhase::new("9", "36"));
        lab.create_brew(&brew).unwrap();

        let patch = BrewPatch {
            bean_name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(lab.update_brew(brew.id, &patch).unwrap());
        assert_eq!(lab.list_brews()[0].id, brew.id);
    }

    #[test]
    fn test_yield_age_and_transfer_scenario() {
        let (lab, _temp) = test_lab();
        let today = Utc::now().date_naive();

        let kenya = Brew::new(lab.next_id(), PressurePhase::new("9", "40"))
            .with_bean_name("Kenya")
            .with_dose("18")
            .with_ratio("2.2");
        let yield_g = kenya.target_yield().unwrap();
        assert!((yield_g - 39.6).abs() < 1e-9);

        let aged = Brew::new(lab.next_id(), PressurePhase::new("9", "36"))
            .with_roast_date(today - Duration::days(10));
        assert_eq!(aged.bean_age_days(today), Some(10));
        assert_eq!(aged.freshness(today), Some(FreshnessBand::Peak));

        lab.create_brew(&kenya).unwrap();
        lab.create_brew(&aged).unwrap();
        lab.create_drink(&Drink::new(lab.next_id(), "Cortado"))
            .unwrap();

        let original_brews = lab.list_brews();
        let original_drinks = lab.list_drinks();

        // Carry the dataset to a second device via the token.
        let token = lab.export_token().unwrap();
        let (other, _other_temp) = test_lab();
        let outcome = other
            .import_from_link(&share_fragment(&token), || true)
            .unwrap();
        assert!(matches!(outcome, ImportOutcome::Applied { .. }));
        assert_eq!(other.list_brews(), original_brews);
        assert_eq!(other.list_drinks(), original_drinks);
    }

    #[test]
    fn test_export_import_roundtrip_with_image() {
        let (lab, _temp) = test_lab();
        lab.create_drink(
            &Drink::new(lab.next_id(), "Cappuccino")
                .with_description("With art.")
                .with_image("data:image/jpeg;base64,/9j/4AAQSkZJRg"),
        )
        .unwrap();

        let token = lab.export_token().unwrap();
        let (other, _other_temp) = test_lab();
        other
            .import_from_link(&share_fragment(&token), || true)
            .unwrap();

        assert_eq!(other.list_drinks(), lab.list_drinks());
    }
}
