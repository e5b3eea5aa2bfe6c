//! Chain access seam.
//!
//! The run pipeline only needs three things from a chain: who is signing, deploying init code
//! and sending a call. `EthersChain` does this against a JSON-RPC node; tests use an in-memory
//! recorder.

pub(crate) mod convert;
mod ethers_client;

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use thiserror::Error;

pub use ethers_client::EthersChain;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid RPC endpoint {url}: {reason}")]
    Endpoint { url: String, reason: String },

    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("failed submitting transaction: {0}")]
    Send(String),

    #[error("transaction {hash} was dropped before confirmation")]
    Dropped { hash: B256 },

    #[error("transaction {hash} reverted")]
    Reverted { hash: B256 },

    #[error("deployment {hash} produced no contract address")]
    MissingContractAddress { hash: B256 },
}

/// A plain call: target, attached value and calldata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl Call {
    pub fn new(to: Address, data: Bytes) -> Self {
        Self {
            to,
            value: U256::ZERO,
            data,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deployment {
    pub address: Address,
    pub tx_hash: B256,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxOutcome {
    pub hash: B256,
    pub block_number: Option<u64>,
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the signer behind this client.
    fn address(&self) -> Address;

    /// Submit contract creation `init_code` and wait until it is mined.
    async fn deploy(&self, label: &str, init_code: Bytes) -> Result<Deployment, ChainError>;

    /// Submit `call` and wait until it is mined.
    async fn send(&self, call: Call) -> Result<TxOutcome, ChainError>;
}
