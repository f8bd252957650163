//! Poseidon hashing and view tags.
//!
//! The protocol hashes with the chain's standard Poseidon sponge so that
//! off-chain derivations agree with Cairo contracts. Single- and
//! multi-input callers go through the same array form.

use starknet_crypto::{poseidon_hash_many, FieldElement};
use subtle::ConstantTimeEq;

/// Poseidon sponge over a variable number of felts, producing one felt.
pub fn poseidon(inputs: &[FieldElement]) -> FieldElement {
    poseidon_hash_many(inputs)
}

/// The one-byte announcement filter: `poseidon([shared_secret]) mod 256`.
pub fn view_tag(shared_secret: &FieldElement) -> u8 {
    poseidon(&[*shared_secret]).to_bytes_be()[31]
}

/// Constant-time check of an announcement's view tag against the expected
/// value for a shared secret.
pub fn view_tag_matches(shared_secret: &FieldElement, expected: u8) -> bool {
    view_tag(shared_secret).ct_eq(&expected).into()
}
