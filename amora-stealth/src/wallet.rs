//! Recipient wallet facade.
//!
//! Bundles a [`StealthKeys`] set with the operations a recipient actually
//! performs: publish a meta-address, export the viewing key for an
//! auditor, and check announcements.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use starknet_crypto::FieldElement;

use amora_codec::meta::parse_viewing_key;
use amora_core::{
    Announcement, ChainTag, MetaAddress, Result, StealthKeys, StealthPayment, ViewingKey,
};
use amora_crypto::curve::normalize_parity;
use amora_crypto::keys::{generate_stealth_keys_with_rng, keypair_from_secret};

use crate::discovery::check_announcement;

/// A recipient wallet: key set plus chain binding.
#[derive(Clone, Copy)]
pub struct AmoraWallet {
    keys: StealthKeys,
    chain: ChainTag,
}

impl AmoraWallet {
    /// Generates a wallet with fresh keys from the given RNG.
    pub fn generate_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        Ok(Self {
            keys: generate_stealth_keys_with_rng(rng)?,
            chain: ChainTag::Starknet,
        })
    }

    /// Generates a wallet with fresh keys from the platform CSPRNG.
    pub fn generate() -> Result<Self> {
        Self::generate_with_rng(&mut OsRng)
    }

    /// Wraps an existing, already-validated key set.
    pub fn from_keys(keys: StealthKeys) -> Result<Self> {
        keys.validate()?;
        Ok(Self {
            keys,
            chain: ChainTag::Starknet,
        })
    }

    /// Rebuilds a wallet from raw secret scalars, e.g. out of key storage.
    /// Both scalars are range-checked and parity-normalized on the way in.
    pub fn from_secrets(
        spending_secret: &FieldElement,
        viewing_secret: &FieldElement,
    ) -> Result<Self> {
        Ok(Self {
            keys: StealthKeys::new(
                keypair_from_secret(spending_secret)?,
                keypair_from_secret(viewing_secret)?,
            ),
            chain: ChainTag::Starknet,
        })
    }

    /// The wallet's key set.
    pub fn keys(&self) -> &StealthKeys {
        &self.keys
    }

    /// The public meta-address to register and share.
    pub fn meta_address(&self) -> MetaAddress {
        self.keys.meta_address(self.chain)
    }

    /// Exports the watch-only capability as a `vk:` string.
    pub fn export_viewing_key(&self) -> String {
        amora_codec::meta::encode_viewing_key(&self.keys.viewing_key(self.chain))
    }

    /// Checks whether one announcement pays this wallet.
    pub fn try_discover(
        &self,
        announcement: &Announcement,
        class_hash: &FieldElement,
    ) -> Result<Option<StealthPayment>> {
        check_announcement(announcement, &self.keys, class_hash)
    }
}

impl std::fmt::Debug for AmoraWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmoraWallet")
            .field("chain", &self.chain)
            .field("meta_address", &self.meta_address())
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

/// Imports a `vk:` viewing-key string, re-establishing the parity
/// invariant on the secret scalar.
pub fn import_viewing_key(s: &str) -> Result<ViewingKey> {
    let mut key = parse_viewing_key(s)?;
    key.viewing_secret = normalize_parity(&key.viewing_secret)?;
    Ok(key)
}
