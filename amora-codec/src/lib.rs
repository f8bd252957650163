//! # Amora Codec
//!
//! The external textual encodings and wire formats the protocol depends on
//! for interoperability:
//!
//! - meta-address strings (`st:starknet:0x..:0x..`)
//! - viewing-key export strings (`vk:starknet:0x..:0x..`)
//! - payment-link URIs (`amora://pay?meta=..`)
//! - the UTF-8 memo codec packed into felt chunks
//! - announcement event records
//! - address canonicalization for string-level equality
//!
//! Everything here is a pure function over values; parse failures are
//! [`amora_core::AmoraError::InvalidFormat`] or `OutOfRange`.

#![forbid(unsafe_code)]

pub mod address;
pub mod event;
pub mod felt_str;
pub mod memo;
pub mod meta;
pub mod payment_link;

pub use address::canonicalize_address;
pub use event::announcement_from_event;
pub use felt_str::{parse_wire_felt, to_wire_hex};
pub use memo::{decode_memo, encode_memo};
pub use meta::{
    encode_meta_address, encode_viewing_key, parse_meta_address, parse_viewing_key,
};
pub use payment_link::{generate_payment_link, parse_payment_link, PaymentRequest};
