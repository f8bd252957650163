//! Meta-address types.

use serde::{Deserialize, Serialize};
use starknet_crypto::FieldElement;

use crate::constants::{CHAIN_TAG_STARKNET, SCHEME_ID_STARK};
use crate::error::{AmoraError, Result};
use crate::serde_felt::{felt_hex, to_hex};

/// Chains a meta-address can target.
///
/// Only Starknet today; the tag is carried in every textual encoding so the
/// strings stay self-describing if more curves are ever added.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainTag {
    /// Starknet mainnet/testnet (STARK curve, Poseidon).
    #[default]
    Starknet,
}

impl ChainTag {
    /// The tag as it appears in encoded strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainTag::Starknet => CHAIN_TAG_STARKNET,
        }
    }

    /// Numeric scheme identifier for this chain's curve instantiation.
    pub fn scheme_id(&self) -> FieldElement {
        match self {
            ChainTag::Starknet => FieldElement::from(SCHEME_ID_STARK),
        }
    }
}

impl std::fmt::Display for ChainTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChainTag {
    type Err = AmoraError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            CHAIN_TAG_STARKNET => Ok(ChainTag::Starknet),
            other => Err(AmoraError::InvalidFormat(format!(
                "unknown chain tag {other:?}"
            ))),
        }
    }
}

/// A recipient's long-lived pair of public keys, published once.
///
/// Senders derive unlimited unlinkable stealth addresses from it without
/// further interaction. Immutable once published.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaAddress {
    /// Target chain.
    pub chain: ChainTag,
    /// Spending public key (x-coordinate).
    #[serde(with = "felt_hex")]
    pub spending_public_key: FieldElement,
    /// Viewing public key (x-coordinate).
    #[serde(with = "felt_hex")]
    pub viewing_public_key: FieldElement,
}

impl MetaAddress {
    /// Builds a meta-address from the two public keys.
    pub fn new(
        chain: ChainTag,
        spending_public_key: FieldElement,
        viewing_public_key: FieldElement,
    ) -> Self {
        Self {
            chain,
            spending_public_key,
            viewing_public_key,
        }
    }

    /// Checks that both keys are non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.spending_public_key == FieldElement::ZERO {
            return Err(AmoraError::InvalidFormat(
                "meta-address spending key is zero".into(),
            ));
        }
        if self.viewing_public_key == FieldElement::ZERO {
            return Err(AmoraError::InvalidFormat(
                "meta-address viewing key is zero".into(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for MetaAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaAddress")
            .field("chain", &self.chain)
            .field("spending_public_key", &to_hex(&self.spending_public_key))
            .field("viewing_public_key", &to_hex(&self.viewing_public_key))
            .finish()
    }
}
