//! # Amora Cryptography
//!
//! STARK-curve and Poseidon primitives for the Amora stealth-address
//! protocol.
//!
//! This crate provides:
//!
//! - **Curve**: scalar sampling, point arithmetic, x-only point recovery
//!   under the even-y convention, and parity normalization
//! - **Hash**: the chain's standard Poseidon sponge and the one-byte view
//!   tag derived from it
//! - **Keys**: key-pair generation and import, and the ECDH shared secret
//! - **Addresses**: the chain's counterfactual deployment-address formula
//!
//! ## The even-y convention
//!
//! The wire format carries x-coordinates only. Both sides of every point
//! operation must reconstruct the same point from an x, so the protocol
//! fixes the even-y root as canonical: private keys are normalized so that
//! `y(k*G)` is even, and [`curve::recover_point`] always selects the even
//! root. Everything downstream leans on that invariant.
//!
//! ## Example
//!
//! ```rust
//! use amora_crypto::keys;
//! use rand::rngs::OsRng;
//!
//! let a = keys::generate_keypair_with_rng(&mut OsRng)?;
//! let b = keys::generate_keypair_with_rng(&mut OsRng)?;
//!
//! // ECDH agrees in both directions.
//! let ab = keys::shared_secret(&a.secret, &b.public)?;
//! let ba = keys::shared_secret(&b.secret, &a.public)?;
//! assert_eq!(ab, ba);
//! # Ok::<(), amora_core::AmoraError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod contract_address;
pub mod curve;
pub mod hash;
pub mod keys;

pub use contract_address::{compute_account_address, compute_contract_address};
pub use curve::{derive_public_key, normalize_parity, random_scalar, recover_point};
pub use hash::{poseidon, view_tag, view_tag_matches};
pub use keys::{generate_keypair, generate_stealth_keys, keypair_from_secret, shared_secret};
