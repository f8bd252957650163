//! # Amora Client
//!
//! A thin orchestrator binding the Amora core to an abstract chain client.
//!
//! The core stays pure; all I/O flows through the [`ChainClient`] trait,
//! which a concrete RPC layer implements elsewhere. The client itself holds
//! exactly three pieces of configuration: the chain client, the registry
//! address, and the stealth-account class hash. No retries, rate limiting,
//! or caching live here; the chain client provides its own idempotency.

#![forbid(unsafe_code)]

pub mod calls;
pub mod chain;
mod client;

pub use chain::{Call, ChainClient, EmittedEvent};
pub use client::{AmoraClient, PaymentInstruction, WithdrawAmount};
