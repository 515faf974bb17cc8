//! Device-to-device transfer tokens.
//!
//! The full dataset is serialized to JSON, zlib-compressed and encoded
//! with the URL-safe base64 alphabet, so the token can ride in a URL
//! fragment (`https://host/#import=<token>`) or any chat message without
//! further escaping. Embedded drink images are data-URI text inside the
//! records; the codec carries them verbatim like any other field.

mod import;

pub use import::{ImportGate, ImportOutcome};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error;

use crate::models::{Brew, Drink};

/// Fragment marker that triggers an import.
pub const IMPORT_MARKER: &str = "#import=";

/// The dataset as it travels inside a token.
///
/// Wire keys are single letters to keep tokens short. A decoded payload
/// may carry either collection alone; the absent one is left untouched
/// on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharePayload {
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    pub brews: Option<Vec<Brew>>,
    #[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
    pub drinks: Option<Vec<Drink>>,
}

/// Errors building a transfer token.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Failed to serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to compress dataset: {0}")]
    Compress(#[from] std::io::Error),
}

/// Errors decoding a transfer token. Decoding never touches the store;
/// a failed decode leaves local data exactly as it was.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Token is not valid base64url: {0}")]
    Alphabet(#[from] base64::DecodeError),

    #[error("Token did not decompress: {0}")]
    Compression(#[from] std::io::Error),

    #[error("Decompressed payload is not a valid dataset: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Token contains neither brews nor drinks")]
    Empty,
}

/// Encodes the full dataset into a single URL-safe token.
pub fn encode_token(brews: &[Brew], drinks: &[Drink]) -> Result<String, EncodeError> {
    let payload = SharePayload {
        brews: Some(brews.to_vec()),
        drinks: Some(drinks.to_vec()),
    };
    let json = serde_json::to_vec(&payload)?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;

    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Decodes a transfer token back into the dataset.
pub fn decode_token(token: &str) -> Result<SharePayload, DecodeError> {
    let compressed = URL_SAFE_NO_PAD.decode(token.trim())?;

    let mut json = Vec::new();
    ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut json)?;

    let payload: SharePayload = serde_json::from_slice(&json)?;
    if payload.brews.is_none() && payload.drinks.is_none() {
        return Err(DecodeError::Empty);
    }
    Ok(payload)
}

/// Builds the URL fragment carrying a token.
pub fn share_fragment(token: &str) -> String {
    format!("{}{}", IMPORT_MARKER, token)
}

/// Extracts a transfer token from a pasted link or bare fragment.
///
/// The marker is the sole import trigger; input without it yields `None`.
pub fn extract_token(input: &str) -> Option<&str> {
    let start = input.find(IMPORT_MARKER)? + IMPORT_MARKER.len();
    let token = &input[start..];
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PressurePhase;
    use chrono::NaiveDate;

    fn sample_brews() -> Vec<Brew> {
        vec![
            Brew::new(1700000000001, PressurePhase::new("9", "36"))
                .with_bean_name("Brasilien")
                .with_roast_date(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
                .with_dose("18")
                .with_ratio("2.5")
                .with_preinfusion(PressurePhase::new("3", "5")),
            Brew::new(1700000000002, PressurePhase::new("8", "40")).with_bean_name("Kenya"),
        ]
    }

    fn sample_drinks() -> Vec<Drink> {
        vec![
            Drink::new(1700000000003, "Cappuccino")
                .with_description("Double shot with micro-textured milk.")
                .with_image("data:image/png;base64,iVBORw0KGgoAAAANSUhEUg"),
            Drink::new(1700000000004, "Espresso"),
        ]
    }

    fn raw_token(json: &[u8]) -> String {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(json).unwrap();
        URL_SAFE_NO_PAD.encode(encoder.finish().unwrap())
    }

    #[test]
    fn test_roundtrip_is_field_equal() {
        let brews = sample_brews();
        let drinks = sample_drinks();

        let token = encode_token(&brews, &drinks).unwrap();
        let payload = decode_token(&token).unwrap();

        assert_eq!(payload.brews, Some(brews));
        assert_eq!(payload.drinks, Some(drinks));
    }

    #[test]
    fn test_roundtrip_of_empty_collections() {
        let token = encode_token(&[], &[]).unwrap();
        let payload = decode_token(&token).unwrap();
        assert_eq!(payload.brews, Some(vec![]));
        assert_eq!(payload.drinks, Some(vec![]));
    }

    #[test]
    fn test_token_is_fragment_safe() {
        let token = encode_token(&sample_brews(), &sample_drinks()).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_token_compresses_repetitive_payloads() {
        // Data-URI images are long repetitive base64 text; the token must
        // come out smaller than the raw JSON it encodes.
        let image = format!("data:image/png;base64,{}", "iVBORw0KGgo".repeat(200));
        let drinks = vec![Drink::new(1, "Latte").with_image(image)];
        let json_len = serde_json::to_vec(&SharePayload {
            brews: Some(vec![]),
            drinks: Some(drinks.clone()),
        })
        .unwrap()
        .len();

        let token = encode_token(&[], &drinks).unwrap();
        assert!(token.len() < json_len);
    }

    #[test]
    fn test_decode_rejects_bad_alphabet() {
        let result = decode_token("not a token!!!");
        assert!(matches!(result, Err(DecodeError::Alphabet(_))));
    }

    #[test]
    fn test_decode_rejects_non_compressed_data() {
        let token = URL_SAFE_NO_PAD.encode(b"plainly not zlib");
        let result = decode_token(&token);
        assert!(matches!(result, Err(DecodeError::Compression(_))));
    }

    #[test]
    fn test_decode_rejects_non_json_payload() {
        let token = raw_token(b"definitely not json");
        let result = decode_token(&token);
        assert!(matches!(result, Err(DecodeError::Payload(_))));
    }

    #[test]
    fn test_decode_rejects_payload_without_collections() {
        let token = raw_token(b"{}");
        let result = decode_token(&token);
        assert!(matches!(result, Err(DecodeError::Empty)));
    }

    #[test]
    fn test_decode_rejects_truncated_token() {
        let token = encode_token(&sample_brews(), &sample_drinks()).unwrap();
        let truncated = &token[..token.len() / 2];
        assert!(decode_token(truncated).is_err());
    }

    #[test]
    fn test_decode_accepts_single_collection_payload() {
        let json = serde_json::to_vec(&serde_json::json!({
            "r": [{
                "id": 42,
                "created_date": "2025-06-01T10:00:00Z",
                "peak": {"bar": "9", "weight": "36"}
            }]
        }))
        .unwrap();
        let payload = decode_token(&raw_token(&json)).unwrap();
        assert_eq!(payload.brews.unwrap().len(), 1);
        assert!(payload.drinks.is_none());
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(
            extract_token("https://coffee-lab.app/#import=abc123"),
            Some("abc123")
        );
        assert_eq!(extract_token("#import=abc123"), Some("abc123"));
        assert_eq!(extract_token("https://coffee-lab.app/"), None);
        assert_eq!(extract_token("#import="), None);
        assert_eq!(extract_token("abc123"), None);
    }

    #[test]
    fn test_share_fragment_roundtrips_through_extract() {
        let fragment = share_fragment("abc123");
        assert_eq!(extract_token(&fragment), Some("abc123"));
    }
}
