//! Import gate: user-confirmed, destructive replacement of local data
//! from a shared link.

use crate::models::{Brew, Drink};
use crate::store::{RecordStore, StoreError};

use super::{decode_token, extract_token, DecodeError};

/// Terminal states of one pass through the import gate.
#[derive(Debug)]
pub enum ImportOutcome {
    /// The input carried no import marker.
    NoToken,
    /// The user declined the overwrite; local data untouched.
    Declined,
    /// The token did not decode; local data untouched.
    Failed(DecodeError),
    /// Collections replaced. Each count is the number of records applied;
    /// `None` means the payload omitted that collection and it was left
    /// alone.
    Applied {
        brews: Option<usize>,
        drinks: Option<usize>,
    },
}

/// Drives a single import attempt against the two stores.
///
/// Import is overwrite, not merge: the decoded payload fully replaces
/// whichever collections it carries. That is the deliberate product
/// behavior, which is why the gate insists on confirmation before it
/// decodes anything.
pub struct ImportGate<'a> {
    brews: &'a RecordStore<Brew>,
    drinks: &'a RecordStore<Drink>,
}

impl<'a> ImportGate<'a> {
    pub fn new(brews: &'a RecordStore<Brew>, drinks: &'a RecordStore<Drink>) -> Self {
        Self { brews, drinks }
    }

    /// Runs the gate once over `input` (a pasted link or fragment).
    ///
    /// `confirm` is invoked at most once, only when a token is present.
    /// Decode problems are reported through the outcome; the only hard
    /// errors are substrate write failures while applying.
    pub fn run(
        &self,
        input: &str,
        confirm: impl FnOnce() -> bool,
    ) -> Result<ImportOutcome, StoreError> {
        let Some(token) = extract_token(input) else {
            return Ok(ImportOutcome::NoToken);
        };

        if !confirm() {
            tracing::debug!("Import declined by user");
            return Ok(ImportOutcome::Declined);
        }

        let payload = match decode_token(token) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Rejected transfer token: {}", e);
                return Ok(ImportOutcome::Failed(e));
            }
        };

        let brews = match payload.brews {
            Some(records) => {
                self.brews.replace_all(&records)?;
                Some(records.len())
            }
            None => None,
        };
        let drinks = match payload.drinks {
            Some(records) => {
                self.drinks.replace_all(&records)?;
                Some(records.len())
            }
            None => None,
        };

        tracing::info!(
            "Imported shared dataset ({} brew(s), {} drink(s))",
            brews.unwrap_or(0),
            drinks.unwrap_or(0)
        );
        Ok(ImportOutcome::Applied { brews, drinks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PressurePhase;
    use crate::share::{encode_token, share_fragment};
    use crate::store::StoreDir;
    use tempfile::TempDir;

    struct Fixture {
        brews: RecordStore<Brew>,
        drinks: RecordStore<Drink>,
        _temp_dir: TempDir,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let dir = StoreDir::new(temp_dir.path().to_path_buf());
        let fixture = Fixture {
            brews: RecordStore::new(dir.clone()),
            drinks: RecordStore::new(dir),
            _temp_dir: temp_dir,
        };
        fixture
            .brews
            .create(&Brew::new(1, PressurePhase::new("9", "36")).with_bean_name("Local"))
            .unwrap();
        fixture
            .drinks
            .create(&Drink::new(2, "Local Drink"))
            .unwrap();
        fixture
    }

    fn incoming_link() -> String {
        let brews = vec![
            Brew::new(10, PressurePhase::new("8", "40")).with_bean_name("Imported A"),
            Brew::new(11, PressurePhase::new("9", "36")).with_bean_name("Imported B"),
        ];
        let drinks = vec![Drink::new(12, "Imported Drink")];
        let token = encode_token(&brews, &drinks).unwrap();
        format!("https://coffee-lab.app/{}", share_fragment(&token))
    }

    #[test]
    fn test_no_marker_yields_no_token() {
        let f = fixture();
        let gate = ImportGate::new(&f.brews, &f.drinks);

        let outcome = gate
            .run("https://coffee-lab.app/", || panic!("must not confirm"))
            .unwrap();
        assert!(matches!(outcome, ImportOutcome::NoToken));
        assert_eq!(f.brews.list().len(), 1);
    }

    #[test]
    fn test_decline_leaves_data_untouched() {
        let f = fixture();
        let gate = ImportGate::new(&f.brews, &f.drinks);

        let outcome = gate.run(&incoming_link(), || false).unwrap();
        assert!(matches!(outcome, ImportOutcome::Declined));
        assert_eq!(f.brews.list()[0].bean_name.as_deref(), Some("Local"));
        assert_eq!(f.drinks.list()[0].title, "Local Drink");
    }

    #[test]
    fn test_accept_replaces_both_collections() {
        let f = fixture();
        let gate = ImportGate::new(&f.brews, &f.drinks);

        let outcome = gate.run(&incoming_link(), || true).unwrap();
        match outcome {
            ImportOutcome::Applied { brews, drinks } => {
                assert_eq!(brews, Some(2));
                assert_eq!(drinks, Some(1));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let brew_names: Vec<_> = f
            .brews
            .list()
            .iter()
            .map(|b| b.bean_name.clone().unwrap())
            .collect();
        assert_eq!(brew_names, vec!["Imported A", "Imported B"]);
        assert_eq!(f.drinks.list()[0].title, "Imported Drink");
    }

    #[test]
    fn test_partial_payload_leaves_other_collection_alone() {
        let f = fixture();
        let gate = ImportGate::new(&f.brews, &f.drinks);

        // Hand-build a token carrying only brews.
        let json = serde_json::to_vec(&serde_json::json!({
            "r": [{
                "id": 99,
                "created_date": "2025-06-01T10:00:00Z",
                "peak": {"bar": "9", "weight": "36"}
            }]
        }))
        .unwrap();
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use flate2::{write::ZlibEncoder, Compression};
        use std::io::Write;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&json).unwrap();
        let token = URL_SAFE_NO_PAD.encode(encoder.finish().unwrap());

        let outcome = gate.run(&share_fragment(&token), || true).unwrap();
        match outcome {
            ImportOutcome::Applied { brews, drinks } => {
                assert_eq!(brews, Some(1));
                assert_eq!(drinks, None);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        assert_eq!(f.brews.list()[0].id, 99);
        assert_eq!(f.drinks.list()[0].title, "Local Drink");
    }

    #[test]
    fn test_failed_decode_leaves_data_untouched() {
        let f = fixture();
        let gate = ImportGate::new(&f.brews, &f.drinks);

        let before_brews = f.brews.list();
        let before_drinks = f.drinks.list();

        let outcome = gate.run("#import=broken-token", || true).unwrap();
        assert!(matches!(outcome, ImportOutcome::Failed(_)));
        assert_eq!(f.brews.list(), before_brews);
        assert_eq!(f.drinks.list(), before_drinks);
    }

    #[test]
    fn test_truncated_token_fails_atomically() {
        let f = fixture();
        let gate = ImportGate::new(&f.brews, &f.drinks);

        let link = incoming_link();
        let truncated = &link[..link.len() - 20];

        let before_brews = f.brews.list();
        let outcome = gate.run(truncated, || true).unwrap();
        assert!(matches!(outcome, ImportOutcome::Failed(_)));
        assert_eq!(f.brews.list(), before_brews);
    }
}
