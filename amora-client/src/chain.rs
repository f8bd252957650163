//! The abstract chain boundary.
//!
//! Everything the protocol needs from a chain fits in five operations:
//! read-only calls, event queries, multicall execution, a deployment-status
//! probe, and counterfactual account deployment. Concrete implementations
//! wrap an RPC transport; tests wrap an in-memory fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use starknet_crypto::FieldElement;

use amora_core::serde_felt::{felt_hex, felt_hex_opt, felt_hex_vec};
use amora_core::Result;

/// A single contract invocation in neutral form: target, entry-point name,
/// and felt calldata. The chain client maps the name to a selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Contract to invoke.
    #[serde(with = "felt_hex")]
    pub to: FieldElement,
    /// Entry-point name, e.g. `"transfer"`.
    pub selector: String,
    /// Calldata felts.
    #[serde(with = "felt_hex_vec")]
    pub calldata: Vec<FieldElement>,
}

impl Call {
    /// Builds a call record.
    pub fn new(to: FieldElement, selector: impl Into<String>, calldata: Vec<FieldElement>) -> Self {
        Self {
            to,
            selector: selector.into(),
            calldata,
        }
    }
}

/// An event as returned by the chain client, data felts in emission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedEvent {
    /// Event data fields.
    #[serde(with = "felt_hex_vec")]
    pub data: Vec<FieldElement>,
    /// Block that contains the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Transaction that emitted the event.
    #[serde(with = "felt_hex_opt", default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<FieldElement>,
}

/// Abstract chain access.
///
/// Implementations own transport concerns (retries, timeouts,
/// cancellation); callers sequence multi-call operations and never hold
/// locks across these awaits.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Executes a read-only call and returns the raw output felts.
    async fn call(&self, call: &Call) -> Result<Vec<FieldElement>>;

    /// Returns events emitted by `emitter` in `[from_block, to_block]`,
    /// in block and intra-block order.
    async fn get_events(
        &self,
        emitter: FieldElement,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<EmittedEvent>>;

    /// Submits a multicall from `account` and returns the transaction hash.
    async fn execute(&self, account: FieldElement, calls: &[Call]) -> Result<FieldElement>;

    /// True when a contract exists at `address`.
    async fn is_deployed(&self, address: FieldElement) -> Result<bool>;

    /// Counterfactually deploys an account contract and returns the
    /// transaction hash. The caller supplies the address-formula inputs:
    /// class hash, salt, and constructor calldata.
    async fn deploy_account(
        &self,
        class_hash: FieldElement,
        salt: FieldElement,
        constructor_calldata: &[FieldElement],
    ) -> Result<FieldElement>;
}
