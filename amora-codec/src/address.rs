//! Address canonicalization.
//!
//! Addresses arrive as hex strings with arbitrary casing and zero padding.
//! Canonical form, used only for equality: lowercase, `0x`-prefixed, no
//! leading zero nibbles. The zero address canonicalizes to `0x0`.

use starknet_crypto::FieldElement;

use crate::felt_str::to_wire_hex;

/// Canonicalizes a hex address string.
pub fn canonicalize_address(address: &str) -> String {
    let lower = address.trim().to_lowercase();
    let digits = lower.strip_prefix("0x").unwrap_or(&lower);
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_owned()
    } else {
        format!("0x{trimmed}")
    }
}

/// The canonical string form of a felt address. Always equal to
/// `canonicalize_address` of any hex rendering of the same value.
pub fn canonical_hex(address: &FieldElement) -> String {
    to_wire_hex(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_case_zeros_and_prefix() {
        assert_eq!(canonicalize_address("0x0001aB"), "0x1ab");
        assert_eq!(canonicalize_address("0x1ab"), "0x1ab");
        assert_eq!(canonicalize_address("1AB"), "0x1ab");
        assert_eq!(canonicalize_address("  0x1ab "), "0x1ab");
    }

    #[test]
    fn zero_address() {
        assert_eq!(canonicalize_address("0x000"), "0x0");
        assert_eq!(canonicalize_address("0x0"), "0x0");
    }

    #[test]
    fn felt_form_agrees() {
        let felt = FieldElement::from(0x1abu64);
        assert_eq!(canonical_hex(&felt), canonicalize_address("0x0001AB"));
    }
}
