//! Serde adapters for field elements.
//!
//! Felts serialize as `0x`-prefixed lowercase hex strings with leading
//! zeros stripped, the same form the textual encodings use. Apply with
//! `#[serde(with = "amora_core::serde_felt::felt_hex")]` and friends.

use starknet_crypto::FieldElement;

/// Formats a felt as `0x`-prefixed lowercase hex without leading zeros.
pub fn to_hex(value: &FieldElement) -> String {
    let full = hex::encode(value.to_bytes_be());
    let trimmed = full.trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_owned()
    } else {
        format!("0x{trimmed}")
    }
}

/// Parses a felt from a hex string, with or without the `0x` prefix.
pub fn from_hex(s: &str) -> Result<FieldElement, crate::AmoraError> {
    FieldElement::from_hex_be(s)
        .map_err(|_| crate::AmoraError::InvalidFormat(format!("invalid felt hex {s:?}")))
}

/// Serde adapter for a plain [`FieldElement`] field.
pub mod felt_hex {
    use serde::{Deserialize, Deserializer, Serializer};
    use starknet_crypto::FieldElement;

    /// Serializes the felt as a hex string.
    pub fn serialize<S: Serializer>(value: &FieldElement, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&super::to_hex(value))
    }

    /// Deserializes the felt from a hex string.
    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<FieldElement, D::Error> {
        let s = String::deserialize(de)?;
        super::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for an `Option<FieldElement>` field.
pub mod felt_hex_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use starknet_crypto::FieldElement;

    /// Serializes the optional felt as a hex string or null.
    pub fn serialize<S: Serializer>(
        value: &Option<FieldElement>,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => ser.serialize_some(&super::to_hex(v)),
            None => ser.serialize_none(),
        }
    }

    /// Deserializes an optional felt from a hex string or null.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<FieldElement>, D::Error> {
        let s: Option<String> = Option::deserialize(de)?;
        s.map(|s| super::from_hex(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Serde adapter for a `Vec<FieldElement>` field.
pub mod felt_hex_vec {
    use serde::{Deserialize, Deserializer, Serializer};
    use starknet_crypto::FieldElement;

    /// Serializes the felts as a sequence of hex strings.
    pub fn serialize<S: Serializer>(value: &[FieldElement], ser: S) -> Result<S::Ok, S::Error> {
        let strings: Vec<String> = value.iter().map(super::to_hex).collect();
        ser.collect_seq(strings)
    }

    /// Deserializes the felts from a sequence of hex strings.
    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<FieldElement>, D::Error> {
        let strings: Vec<String> = Vec::deserialize(de)?;
        strings
            .iter()
            .map(|s| super::from_hex(s).map_err(serde::de::Error::custom))
            .collect()
    }
}
