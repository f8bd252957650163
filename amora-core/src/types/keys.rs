//! Key types for Amora.
//!
//! All keys are STARK-curve scalars and x-coordinates. Private keys are
//! parity-normalized at generation and import time: `y(k*G)` is always even,
//! which is what makes x-only transport of public keys sound. The types here
//! only hold the values; the invariant is enforced by `amora-crypto`.

use serde::{Deserialize, Serialize};
use starknet_crypto::FieldElement;

use crate::error::{AmoraError, Result};
use crate::serde_felt::{felt_hex, to_hex};

use super::meta::{ChainTag, MetaAddress};

/// A STARK-curve key pair.
///
/// `public` is the x-coordinate of `secret * G`; the full point is
/// recoverable under the even-y convention.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    /// Private scalar in `[1, N-1]`, parity-normalized.
    #[serde(with = "felt_hex")]
    pub secret: FieldElement,
    /// x-coordinate of `secret * G`.
    #[serde(with = "felt_hex")]
    pub public: FieldElement,
}

impl KeyPair {
    /// Bundles a secret scalar with its public x-coordinate.
    pub fn new(secret: FieldElement, public: FieldElement) -> Self {
        Self { secret, public }
    }

    /// Checks that neither half is zero.
    pub fn validate(&self) -> Result<()> {
        if self.secret == FieldElement::ZERO || self.public == FieldElement::ZERO {
            return Err(AmoraError::ZeroPoint);
        }
        Ok(())
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("secret", &"[REDACTED]")
            .field("public", &to_hex(&self.public))
            .finish()
    }
}

/// A recipient's full key set: independent spending and viewing pairs.
///
/// Created once, persisted, registered on-chain once, and used to scan
/// forever.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct StealthKeys {
    /// Authorizes transfers out of derived stealth accounts.
    pub spending: KeyPair,
    /// Detects incoming payments; safe to hand to an auditor.
    pub viewing: KeyPair,
}

impl StealthKeys {
    /// Bundles the two key pairs.
    pub fn new(spending: KeyPair, viewing: KeyPair) -> Self {
        Self { spending, viewing }
    }

    /// Checks both pairs.
    pub fn validate(&self) -> Result<()> {
        self.spending.validate()?;
        self.viewing.validate()
    }

    /// The public half, as published on-chain and in meta-address strings.
    pub fn meta_address(&self, chain: ChainTag) -> MetaAddress {
        MetaAddress::new(chain, self.spending.public, self.viewing.public)
    }

    /// The watch-only capability: viewing secret plus spending public key.
    pub fn viewing_key(&self, chain: ChainTag) -> ViewingKey {
        ViewingKey {
            chain,
            viewing_secret: self.viewing.secret,
            spending_public_key: self.spending.public,
        }
    }
}

/// A watch-only capability.
///
/// Enough to detect incoming payments and reconstruct stealth addresses,
/// but not to derive spending keys.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewingKey {
    /// Chain this capability applies to.
    pub chain: ChainTag,
    /// The viewing private scalar.
    #[serde(with = "felt_hex")]
    pub viewing_secret: FieldElement,
    /// The spending public key, needed to reconstruct stealth addresses.
    #[serde(with = "felt_hex")]
    pub spending_public_key: FieldElement,
}

impl ViewingKey {
    /// Checks that both values are non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.viewing_secret == FieldElement::ZERO
            || self.spending_public_key == FieldElement::ZERO
        {
            return Err(AmoraError::ZeroPoint);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ViewingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewingKey")
            .field("chain", &self.chain)
            .field("viewing_secret", &"[REDACTED]")
            .field("spending_public_key", &to_hex(&self.spending_public_key))
            .finish()
    }
}
