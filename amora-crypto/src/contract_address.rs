//! Counterfactual contract-address computation.
//!
//! Starknet fixes the deployment address as a chained Pedersen hash over
//! the prefix `"STARKNET_CONTRACT_ADDRESS"`, the deployer, the salt, the
//! class hash, and the hash of the constructor calldata, reduced modulo
//! `2^251 - 256`. Stealth accounts are deployed counterfactually, so the
//! deployer is always zero here; the result must agree bit-for-bit with
//! the on-chain deployer.

use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::One;
use starknet_crypto::{pedersen_hash, FieldElement};

use crate::curve::{biguint_to_felt, felt_to_biguint};

lazy_static! {
    /// `"STARKNET_CONTRACT_ADDRESS"` as a big-endian short string.
    static ref CONTRACT_ADDRESS_PREFIX: FieldElement =
        FieldElement::from_byte_slice_be(b"STARKNET_CONTRACT_ADDRESS")
            .expect("prefix short string fits the field");

    /// Address space bound `2^251 - 256`.
    static ref ADDR_BOUND: BigUint = (BigUint::one() << 251) - BigUint::from(256u32);
}

/// Pedersen chain over a felt sequence, finalized with the length.
fn hash_on_elements(data: &[FieldElement]) -> FieldElement {
    let mut acc = FieldElement::ZERO;
    for element in data {
        acc = pedersen_hash(&acc, element);
    }
    pedersen_hash(&acc, &FieldElement::from(data.len()))
}

/// Computes the deployment address of a counterfactual contract.
pub fn compute_contract_address(
    salt: &FieldElement,
    class_hash: &FieldElement,
    constructor_calldata: &[FieldElement],
) -> FieldElement {
    let calldata_hash = hash_on_elements(constructor_calldata);
    let raw = hash_on_elements(&[
        *CONTRACT_ADDRESS_PREFIX,
        FieldElement::ZERO, // deployer
        *salt,
        *class_hash,
        calldata_hash,
    ]);
    biguint_to_felt(&(felt_to_biguint(&raw) % &*ADDR_BOUND))
}

/// Computes a stealth account's address from its one-time public key.
///
/// The public key doubles as the salt, so the address is a function of the
/// key alone. Fresh ephemerals keep addresses from colliding; ephemerals
/// must never be reused.
pub fn compute_account_address(
    public_key: &FieldElement,
    class_hash: &FieldElement,
) -> FieldElement {
    compute_contract_address(public_key, class_hash, &[*public_key])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_hash() -> FieldElement {
        FieldElement::from_hex_be(
            "0x2f3cf2b2b8497c98bd7bca205497bbbea8a99686ea97adc8f65e222a313f0d",
        )
        .unwrap()
    }

    #[test]
    fn deterministic() {
        let key = FieldElement::from(0x1234u64);
        let a = compute_account_address(&key, &class_hash());
        let b = compute_account_address(&key, &class_hash());
        assert_eq!(a, b);
    }

    #[test]
    fn sensitive_to_every_input() {
        let key = FieldElement::from(0x1234u64);
        let base = compute_account_address(&key, &class_hash());

        let other_key = compute_account_address(&FieldElement::from(0x1235u64), &class_hash());
        assert_ne!(base, other_key);

        let other_class =
            compute_account_address(&key, &(class_hash() + FieldElement::ONE));
        assert_ne!(base, other_class);

        let other_salt = compute_contract_address(
            &FieldElement::from(9u64),
            &class_hash(),
            &[key],
        );
        assert_ne!(base, other_salt);
    }

    #[test]
    fn account_form_matches_general_form() {
        let key = FieldElement::from(0xabcdu64);
        assert_eq!(
            compute_account_address(&key, &class_hash()),
            compute_contract_address(&key, &class_hash(), &[key])
        );
    }

    #[test]
    fn stays_below_address_bound() {
        for i in 0u64..8 {
            let addr = compute_account_address(&FieldElement::from(1000 + i), &class_hash());
            assert!(felt_to_biguint(&addr) < *ADDR_BOUND);
        }
    }
}
