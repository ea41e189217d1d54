//! Codec configuration, so other device families can swap in their key

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::xtea::{ROUNDS, T4E_KEY};

/// Key and round count handed to the codec.
///
/// Stored as JSON, with key words written as hex strings:
/// `{"key": ["0x8fcb06da", "0xac193e62", "0x41500c5c", "0x64a7b1db"], "rounds": 32}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    #[serde(with = "hex_words")]
    pub key: [u32; 4],
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

fn default_rounds() -> u32 {
    ROUNDS
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            key: T4E_KEY,
            rounds: ROUNDS,
        }
    }
}

impl CodecConfig {
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse codec config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read codec config {}", path.display()))?;
        Self::from_json(&contents)
    }
}

mod hex_words {
    use super::*;

    pub fn serialize<S: Serializer>(key: &[u32; 4], s: S) -> Result<S::Ok, S::Error> {
        key.map(|w| format!("0x{w:08x}")).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u32; 4], D::Error> {
        let words = <[String; 4]>::deserialize(d)?;

        let mut key = [0u32; 4];
        for (out, word) in key.iter_mut().zip(&words) {
            let digits = word
                .strip_prefix("0x")
                .or_else(|| word.strip_prefix("0X"))
                .unwrap_or(word);
            *out = u32::from_str_radix(digits, 16).map_err(|e| {
                serde::de::Error::custom(format!("Invalid key word {word:?}: {e}"))
            })?;
        }

        Ok(key)
    }
}
