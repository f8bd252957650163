//! Announcement records.
//!
//! Announcements are the only on-chain trace a stealth payment leaves:
//! the one-time address, the sender's ephemeral public key, a one-byte
//! view tag, and an opaque metadata felt sequence. By convention the
//! metadata starts `[token, amount_low, amount_high, ...memo]`, but
//! nothing in the scan pipeline depends on that layout.

use serde::{Deserialize, Serialize};
use starknet_crypto::FieldElement;

use crate::error::{AmoraError, Result};
use crate::serde_felt::{felt_hex, felt_hex_opt, felt_hex_vec, to_hex};

use super::amount::TokenAmount;

/// A payment announcement, as emitted by the registry contract.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// The one-time stealth account address funds were sent to.
    #[serde(with = "felt_hex")]
    pub stealth_address: FieldElement,
    /// Account that called `announce` (public; sender anonymity is a
    /// non-goal).
    #[serde(with = "felt_hex_opt", default, skip_serializing_if = "Option::is_none")]
    pub caller_address: Option<FieldElement>,
    /// The sender's single-use ephemeral public key.
    #[serde(with = "felt_hex")]
    pub ephemeral_public_key: FieldElement,
    /// Low byte of `poseidon([shared_secret])`; the 1-in-256 scan filter.
    pub view_tag: u8,
    /// Opaque metadata felts.
    #[serde(with = "felt_hex_vec", default)]
    pub metadata: Vec<FieldElement>,
    /// Block the announcement event landed in, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Transaction that emitted the event, when known.
    #[serde(with = "felt_hex_opt", default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<FieldElement>,
}

impl Announcement {
    /// Builds an announcement with no chain context attached.
    pub fn new(
        stealth_address: FieldElement,
        ephemeral_public_key: FieldElement,
        view_tag: u8,
        metadata: Vec<FieldElement>,
    ) -> Self {
        Self {
            stealth_address,
            caller_address: None,
            ephemeral_public_key,
            view_tag,
            metadata,
            block_number: None,
            transaction_hash: None,
        }
    }

    /// Checks the structure: the registry asserts both the stealth address
    /// and the ephemeral key are non-zero, so a zero here means a malformed
    /// record.
    pub fn validate(&self) -> Result<()> {
        if self.stealth_address == FieldElement::ZERO {
            return Err(AmoraError::InvalidFormat(
                "announcement stealth address is zero".into(),
            ));
        }
        if self.ephemeral_public_key == FieldElement::ZERO {
            return Err(AmoraError::InvalidFormat(
                "announcement ephemeral key is zero".into(),
            ));
        }
        Ok(())
    }

    /// Token address under the conventional metadata layout.
    pub fn token_address(&self) -> Option<FieldElement> {
        self.metadata.first().copied()
    }

    /// Amount under the conventional metadata layout.
    pub fn amount(&self) -> Option<TokenAmount> {
        TokenAmount::from_felts(self.metadata.get(1)?, self.metadata.get(2)?)
    }

    /// Trailing memo felts under the conventional metadata layout.
    pub fn memo_felts(&self) -> &[FieldElement] {
        self.metadata.get(3..).unwrap_or_default()
    }
}

impl std::fmt::Debug for Announcement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Announcement")
            .field("stealth_address", &to_hex(&self.stealth_address))
            .field("ephemeral_public_key", &to_hex(&self.ephemeral_public_key))
            .field("view_tag", &self.view_tag)
            .field("metadata_len", &self.metadata.len())
            .field("block_number", &self.block_number)
            .finish()
    }
}
