//! Typed request builders.
//!
//! One function per on-chain operation, each returning a neutral [`Call`]
//! record. Entry-point names are fixed by the registry and ERC-20 ABIs.

use starknet_crypto::FieldElement;

use amora_core::TokenAmount;

use crate::chain::Call;

/// Registry entry point registering a meta-address.
pub const SELECTOR_REGISTER_KEYS: &str = "register_keys";
/// Registry view returning a registrant's meta-address keys.
pub const SELECTOR_GET_META_ADDRESS: &str = "get_meta_address";
/// Registry view telling whether a registrant has keys.
pub const SELECTOR_IS_REGISTERED: &str = "is_registered";
/// Registry entry point emitting a payment announcement.
pub const SELECTOR_ANNOUNCE: &str = "announce";
/// ERC-20 transfer entry point.
pub const SELECTOR_TRANSFER: &str = "transfer";
/// ERC-20 balance view.
pub const SELECTOR_BALANCE_OF: &str = "balanceOf";

/// `register_keys(spending_pub, viewing_pub)` on the registry.
pub fn register_keys(
    registry: FieldElement,
    spending_public_key: FieldElement,
    viewing_public_key: FieldElement,
) -> Call {
    Call::new(
        registry,
        SELECTOR_REGISTER_KEYS,
        vec![spending_public_key, viewing_public_key],
    )
}

/// `get_meta_address(registrant)` on the registry.
pub fn get_meta_address(registry: FieldElement, registrant: FieldElement) -> Call {
    Call::new(registry, SELECTOR_GET_META_ADDRESS, vec![registrant])
}

/// `is_registered(registrant)` on the registry.
pub fn is_registered(registry: FieldElement, registrant: FieldElement) -> Call {
    Call::new(registry, SELECTOR_IS_REGISTERED, vec![registrant])
}

/// `announce(stealth_address, ephemeral_pub, view_tag, metadata)` on the
/// registry. Metadata is serialized as a length-prefixed felt span.
pub fn announce(
    registry: FieldElement,
    stealth_address: FieldElement,
    ephemeral_public_key: FieldElement,
    view_tag: u8,
    metadata: &[FieldElement],
) -> Call {
    let mut calldata = Vec::with_capacity(4 + metadata.len());
    calldata.push(stealth_address);
    calldata.push(ephemeral_public_key);
    calldata.push(FieldElement::from(view_tag));
    calldata.push(FieldElement::from(metadata.len()));
    calldata.extend_from_slice(metadata);
    Call::new(registry, SELECTOR_ANNOUNCE, calldata)
}

/// `transfer(recipient, amount)` on an ERC-20 token. The amount travels as
/// its two 128-bit halves.
pub fn transfer(token: FieldElement, recipient: FieldElement, amount: TokenAmount) -> Call {
    Call::new(
        token,
        SELECTOR_TRANSFER,
        vec![recipient, amount.low_felt(), amount.high_felt()],
    )
}

/// `balanceOf(account)` on an ERC-20 token.
pub fn balance_of(token: FieldElement, account: FieldElement) -> Call {
    Call::new(token, SELECTOR_BALANCE_OF, vec![account])
}

/// The conventional announcement metadata for a token transfer:
/// `[token, amount_low, amount_high, ...extra]`.
pub fn transfer_metadata(
    token: FieldElement,
    amount: TokenAmount,
    extra: &[FieldElement],
) -> Vec<FieldElement> {
    let mut metadata = Vec::with_capacity(3 + extra.len());
    metadata.push(token);
    metadata.push(amount.low_felt());
    metadata.push(amount.high_felt());
    metadata.extend_from_slice(extra);
    metadata
}
