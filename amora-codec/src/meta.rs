//! Meta-address and viewing-key string encodings.
//!
//! Grammar:
//!
//! ```text
//! meta-address: "st" ":" <chain> ":" <hex 0x..> ":" <hex 0x..>
//! viewing-key:  "vk" ":" <chain> ":" <hex 0x..> ":" <hex 0x..>
//! ```
//!
//! Exactly four colon-separated parts, a known chain tag, and each hex
//! value below `2^252`.

use starknet_crypto::FieldElement;

use amora_core::constants::{META_ADDRESS_PREFIX, VIEWING_KEY_PREFIX};
use amora_core::{AmoraError, ChainTag, MetaAddress, Result, ViewingKey};

use crate::felt_str::{parse_wire_felt, to_wire_hex};

/// Encodes a meta-address in its shareable string form.
pub fn encode_meta_address(meta: &MetaAddress) -> String {
    format!(
        "{}:{}:{}:{}",
        META_ADDRESS_PREFIX,
        meta.chain,
        to_wire_hex(&meta.spending_public_key),
        to_wire_hex(&meta.viewing_public_key),
    )
}

/// Parses a meta-address string.
pub fn parse_meta_address(s: &str) -> Result<MetaAddress> {
    let (chain, spending, viewing) = split_parts(s, META_ADDRESS_PREFIX)?;
    let meta = MetaAddress::new(chain, spending, viewing);
    meta.validate()?;
    Ok(meta)
}

/// Encodes a viewing key in its exportable string form.
pub fn encode_viewing_key(key: &ViewingKey) -> String {
    format!(
        "{}:{}:{}:{}",
        VIEWING_KEY_PREFIX,
        key.chain,
        to_wire_hex(&key.viewing_secret),
        to_wire_hex(&key.spending_public_key),
    )
}

/// Parses a viewing-key export string. Both values must be non-zero.
///
/// The parsed secret is taken verbatim; callers that need the parity
/// invariant re-established import through the wallet layer.
pub fn parse_viewing_key(s: &str) -> Result<ViewingKey> {
    let (chain, viewing_secret, spending_public_key) = split_parts(s, VIEWING_KEY_PREFIX)?;
    let key = ViewingKey {
        chain,
        viewing_secret,
        spending_public_key,
    };
    key.validate().map_err(|_| {
        AmoraError::InvalidFormat("viewing-key string contains a zero value".into())
    })?;
    Ok(key)
}

fn split_parts(s: &str, prefix: &str) -> Result<(ChainTag, FieldElement, FieldElement)> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 4 {
        return Err(AmoraError::InvalidFormat(format!(
            "expected 4 colon-separated fields, got {}",
            parts.len()
        )));
    }
    if parts[0] != prefix {
        return Err(AmoraError::InvalidFormat(format!(
            "expected prefix {prefix:?}, got {:?}",
            parts[0]
        )));
    }
    let chain: ChainTag = parts[1].parse()?;
    Ok((chain, parse_wire_felt(parts[2])?, parse_wire_felt(parts[3])?))
}
