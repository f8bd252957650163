//! Protocol constants for Amora.
//!
//! Wire-format prefixes and sizes are fixed by the protocol; changing any of
//! them breaks interoperability with deployed registries and published
//! meta-addresses.

/// Chain tag carried in meta-address and viewing-key strings.
pub const CHAIN_TAG_STARKNET: &str = "starknet";

/// Prefix of the meta-address string form (`st:starknet:0x..:0x..`).
pub const META_ADDRESS_PREFIX: &str = "st";

/// Prefix of the viewing-key export string form (`vk:starknet:0x..:0x..`).
pub const VIEWING_KEY_PREFIX: &str = "vk";

/// URI scheme of payment links.
pub const PAYMENT_LINK_SCHEME: &str = "amora";

/// URI host of payment links (`amora://pay?...`).
pub const PAYMENT_LINK_HOST: &str = "pay";

/// Scheme identifier for the STARK-curve instantiation: the short string
/// `"STARK"` read as a big-endian integer.
pub const SCHEME_ID_STARK: u64 = 0x5354_4152_4B;

/// Number of bits a wire-format felt may occupy. Hex values in the textual
/// encodings must be strictly below `2^252`.
pub const FELT_WIRE_BITS: u32 = 252;

/// Bytes packed into each memo felt after the length prefix.
pub const MEMO_CHUNK_SIZE: usize = 31;

/// Minimum number of data fields in a well-formed announcement event.
pub const MIN_EVENT_DATA_FIELDS: usize = 4;

/// Number of possible view-tag values.
///
/// A one-byte tag filters ~255/256 of announcements without any curve work.
pub const VIEW_TAG_SPACE: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_id_matches_short_string() {
        // "STARK" as a big-endian integer, decimal 357895852619.
        let mut value = 0u64;
        for b in b"STARK" {
            value = (value << 8) | u64::from(*b);
        }
        assert_eq!(SCHEME_ID_STARK, value);
        assert_eq!(SCHEME_ID_STARK, 357_895_852_619);
    }
}
