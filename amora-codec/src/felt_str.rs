//! Wire-format felt strings.
//!
//! The textual encodings carry felts as `0x`-prefixed hex whose integer
//! value must be strictly below `2^252`. Leading zeros are accepted on
//! parse and stripped on output.

use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::One;
use starknet_crypto::FieldElement;

use amora_core::{AmoraError, Result};

lazy_static! {
    static ref WIRE_BOUND: BigUint = BigUint::one() << 252;
}

/// Parses a wire-format felt: `0x` prefix required, value `< 2^252`, and a
/// valid field element.
pub fn parse_wire_felt(s: &str) -> Result<FieldElement> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| AmoraError::InvalidFormat(format!("felt {s:?} is missing the 0x prefix")))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AmoraError::InvalidFormat(format!(
            "felt {s:?} is not valid hex"
        )));
    }
    let value = BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| AmoraError::InvalidFormat(format!("felt {s:?} is not valid hex")))?;
    if value >= *WIRE_BOUND {
        return Err(AmoraError::OutOfRange(format!(
            "felt {s} is not below 2^252"
        )));
    }
    FieldElement::from_byte_slice_be(&value.to_bytes_be())
        .map_err(|_| AmoraError::OutOfRange(format!("felt {s} exceeds the field modulus")))
}

/// Formats a felt in canonical wire form: lowercase, `0x`-prefixed, no
/// leading zeros.
pub fn to_wire_hex(value: &FieldElement) -> String {
    amora_core::serde_felt::to_hex(value)
}

/// Reads a felt as a `u64`, or `None` when it does not fit.
pub fn felt_to_u64(value: &FieldElement) -> Option<u64> {
    let bytes = value.to_bytes_be();
    if bytes[..24].iter().any(|b| *b != 0) {
        return None;
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&bytes[24..]);
    Some(u64::from_be_bytes(low))
}
