//! Token amounts as the chain's two-felt u256 convention.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use starknet_crypto::FieldElement;

use crate::error::{AmoraError, Result};

/// A u256 token amount split into 128-bit halves, the layout ERC-20
/// calldata and announcement metadata use on Starknet.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct TokenAmount {
    /// Low 128 bits.
    pub low: u128,
    /// High 128 bits.
    pub high: u128,
}

impl TokenAmount {
    /// Zero amount.
    pub const ZERO: Self = Self { low: 0, high: 0 };

    /// Builds an amount from its halves.
    pub fn new(low: u128, high: u128) -> Self {
        Self { low, high }
    }

    /// Parses a decimal string into a u256 amount.
    pub fn from_dec_str(s: &str) -> Result<Self> {
        let value = s
            .parse::<BigUint>()
            .map_err(|_| AmoraError::InvalidFormat(format!("invalid decimal amount {s:?}")))?;
        if value.bits() > 256 {
            return Err(AmoraError::OutOfRange(format!(
                "amount {s} does not fit in a u256"
            )));
        }
        let mask = (BigUint::from(1u8) << 128) - 1u8;
        let low_digits = (&value & &mask).to_u64_digits();
        let high_digits = (value >> 128u32).to_u64_digits();
        Ok(Self {
            low: digits_to_u128(&low_digits),
            high: digits_to_u128(&high_digits),
        })
    }

    /// Rebuilds an amount from two felts, as read back from calldata or
    /// metadata. Returns `None` when either half exceeds 128 bits.
    pub fn from_felts(low: &FieldElement, high: &FieldElement) -> Option<Self> {
        Some(Self {
            low: felt_to_u128(low)?,
            high: felt_to_u128(high)?,
        })
    }

    /// Low half as a felt.
    pub fn low_felt(&self) -> FieldElement {
        FieldElement::from(self.low)
    }

    /// High half as a felt.
    pub fn high_felt(&self) -> FieldElement {
        FieldElement::from(self.high)
    }

    /// True when the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.low == 0 && self.high == 0
    }

    /// The amount as a big integer.
    pub fn to_biguint(&self) -> BigUint {
        (BigUint::from(self.high) << 128) | BigUint::from(self.low)
    }
}

impl From<u128> for TokenAmount {
    fn from(value: u128) -> Self {
        Self {
            low: value,
            high: 0,
        }
    }
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

fn digits_to_u128(digits: &[u64]) -> u128 {
    let mut value = 0u128;
    for (i, d) in digits.iter().take(2).enumerate() {
        value |= u128::from(*d) << (64 * i);
    }
    value
}

/// Reads a felt as a u128, or `None` when it does not fit.
pub fn felt_to_u128(value: &FieldElement) -> Option<u128> {
    let bytes = value.to_bytes_be();
    if bytes[..16].iter().any(|b| *b != 0) {
        return None;
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&bytes[16..]);
    Some(u128::from_be_bytes(low))
}
