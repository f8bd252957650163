//! # Amora Core
//!
//! Core types, errors, and constants for the Amora stealth-address protocol
//! on Starknet.
//!
//! This crate provides the foundational building blocks used by all other
//! Amora crates:
//!
//! - **Types**: Domain models for keys, meta-addresses, announcements, and
//!   scan results
//! - **Errors**: A single error enum with distinct, matchable variants
//! - **Constants**: Protocol constants and textual-encoding prefixes
//!
//! All wire-level values are STARK field elements
//! ([`FieldElement`]), re-exported here so downstream crates agree on a
//! single backend type.
//!
//! ## Example
//!
//! ```rust
//! use amora_core::Announcement;
//! use starknet_crypto::FieldElement;
//!
//! let ann = Announcement::new(
//!     FieldElement::from(7u64),
//!     FieldElement::from(11u64),
//!     0x42,
//!     vec![],
//! );
//! assert!(ann.validate().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod constants;
pub mod error;
pub mod serde_felt;
pub mod types;

pub use error::{AmoraError, Result};
pub use types::*;

pub use starknet_crypto::FieldElement;
