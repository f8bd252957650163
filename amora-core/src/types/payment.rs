//! Scan results.

use serde::{Deserialize, Serialize};
use starknet_crypto::FieldElement;

use crate::serde_felt::{felt_hex, to_hex};

use super::announcement::Announcement;

/// A confirmed incoming payment with its recovered spending key.
///
/// Invariant: `stealth_private_key * G` has x-coordinate
/// `stealth_public_key`, and the account address derived from that key
/// equals `announcement.stealth_address`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealthPayment {
    /// The announcement this payment was recovered from.
    pub announcement: Announcement,
    /// ECDH shared secret (x-coordinate of the DH point).
    #[serde(with = "felt_hex")]
    pub shared_secret: FieldElement,
    /// x-coordinate of the one-time public key.
    #[serde(with = "felt_hex")]
    pub stealth_public_key: FieldElement,
    /// One-time private key `(k_spend + H(s)) mod N`.
    #[serde(with = "felt_hex")]
    pub stealth_private_key: FieldElement,
}

impl std::fmt::Debug for StealthPayment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StealthPayment")
            .field("announcement", &self.announcement)
            .field("shared_secret", &"[REDACTED]")
            .field("stealth_public_key", &to_hex(&self.stealth_public_key))
            .field("stealth_private_key", &"[REDACTED]")
            .finish()
    }
}

/// A confirmed incoming payment found with the viewing key only.
///
/// Identical to [`StealthPayment`] minus the spending key, which a
/// watch-only scanner cannot derive.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchOnlyPayment {
    /// The announcement this payment was recovered from.
    pub announcement: Announcement,
    /// ECDH shared secret (x-coordinate of the DH point).
    #[serde(with = "felt_hex")]
    pub shared_secret: FieldElement,
    /// x-coordinate of the one-time public key.
    #[serde(with = "felt_hex")]
    pub stealth_public_key: FieldElement,
}

impl std::fmt::Debug for WatchOnlyPayment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchOnlyPayment")
            .field("announcement", &self.announcement)
            .field("shared_secret", &"[REDACTED]")
            .field("stealth_public_key", &to_hex(&self.stealth_public_key))
            .finish()
    }
}
