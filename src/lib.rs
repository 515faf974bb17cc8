//! Coffee Lab core library
//!
//! Local record store and transfer codec for espresso brew logs and drink
//! recipe cards. Data lives on-device; moving it to another device is a
//! compressed, URL-safe token carried by the user, not a server protocol.

pub mod app;
pub mod commands;
pub mod config;
pub mod id;
pub mod models;
pub mod seed;
pub mod share;
pub mod store;

pub use app::CoffeeLab;
pub use config::Config;
pub use id::IdSource;
pub use models::{
    Brew, BrewPatch, Drink, DrinkPatch, FreshnessBand, ImageError, PressurePhase,
};
pub use seed::{ensure_seeded, SeedReport};
pub use share::{
    decode_token, encode_token, extract_token, share_fragment, DecodeError, EncodeError,
    ImportGate, ImportOutcome, SharePayload,
};
pub use store::{Record, RecordStore, Slot, StoreDir, StoreError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
