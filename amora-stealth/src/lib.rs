//! # Amora Stealth
//!
//! Stealth-address derivation for senders and payment discovery for
//! recipients.
//!
//! A sender takes a recipient's meta-address and derives a one-time
//! account address plus the announcement fields; the recipient later
//! recognizes the announcement with the viewing key and recovers the
//! one-time spending key with the spending key. The two sides meet at the
//! ECDH shared secret `x(r * K_view) == x(k_view * R)`.

#![forbid(unsafe_code)]

pub mod discovery;
pub mod payment;
pub mod wallet;

pub use discovery::{
    check_announcement, check_announcement_watch_only, derive_stealth_private_key, ScanOutcome,
};
pub use payment::{create_stealth_address, create_stealth_address_with_rng, StealthAddressResult};
pub use wallet::{import_viewing_key, AmoraWallet};
