//! Sender-side stealth address generation.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use starknet_crypto::FieldElement;

use amora_core::serde_felt::felt_hex;
use amora_core::{MetaAddress, Result};
use amora_crypto::contract_address::compute_account_address;
use amora_crypto::curve::{add_points, derive_public_key, mul_base, random_scalar, recover_point};
use amora_crypto::hash::{poseidon, view_tag};
use amora_crypto::keys::shared_secret;

/// Everything a sender needs to pay: the one-time address to transfer to,
/// and the fields to publish in the announcement.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct StealthAddressResult {
    /// The one-time account address to send funds to.
    #[serde(with = "felt_hex")]
    pub stealth_address: FieldElement,
    /// x-coordinate of the one-time public key (also the deployment salt).
    #[serde(with = "felt_hex")]
    pub stealth_public_key: FieldElement,
    /// The single-use ephemeral public key to publish.
    #[serde(with = "felt_hex")]
    pub ephemeral_public_key: FieldElement,
    /// The scan filter byte to publish.
    pub view_tag: u8,
}

/// Derives the stealth public key `x( point(K_spend) + H(s)*G )`.
///
/// The sum's y-coordinate may be odd; only its x matters, because x is
/// invariant under point negation and the recipient's spending scalar is
/// parity-normalized.
pub fn derive_stealth_public_key(
    spending_public_key: &FieldElement,
    shared: &FieldElement,
) -> Result<FieldElement> {
    let spend_point = recover_point(spending_public_key)?;
    let tweak = mul_base(&poseidon(&[*shared]))?;
    Ok(add_points(&spend_point, &tweak)?.x)
}

/// Generates a one-time stealth address for the recipient behind `meta`.
///
/// Samples a fresh ephemeral key pair from `rng`; every call yields an
/// unlinkable new address. The ephemeral secret never leaves this
/// function.
pub fn create_stealth_address_with_rng<R: RngCore + CryptoRng>(
    meta: &MetaAddress,
    class_hash: &FieldElement,
    rng: &mut R,
) -> Result<StealthAddressResult> {
    meta.validate()?;

    let ephemeral_secret = random_scalar(rng)?;
    let ephemeral_public_key = derive_public_key(&ephemeral_secret)?;
    let shared = shared_secret(&ephemeral_secret, &meta.viewing_public_key)?;
    let tag = view_tag(&shared);
    let stealth_public_key = derive_stealth_public_key(&meta.spending_public_key, &shared)?;
    let stealth_address = compute_account_address(&stealth_public_key, class_hash);

    Ok(StealthAddressResult {
        stealth_address,
        stealth_public_key,
        ephemeral_public_key,
        view_tag: tag,
    })
}

/// [`create_stealth_address_with_rng`] with the platform CSPRNG.
pub fn create_stealth_address(
    meta: &MetaAddress,
    class_hash: &FieldElement,
) -> Result<StealthAddressResult> {
    create_stealth_address_with_rng(meta, class_hash, &mut OsRng)
}
