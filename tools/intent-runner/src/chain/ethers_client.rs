use std::time::Duration;

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use ethers::{
    middleware::{NonceManagerMiddleware, SignerMiddleware},
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{TransactionReceipt, TransactionRequest, U64},
};
use tracing::debug;

use super::{
    convert::{from_h160, from_h256, to_ethers_bytes, to_ethers_u256, to_h160},
    Call, ChainClient, ChainError, Deployment, TxOutcome,
};

// Nonce manager sits outermost; it must be initialized before any concurrent send.
type Client = NonceManagerMiddleware<SignerMiddleware<Provider<Http>, LocalWallet>>;

/// JSON-RPC chain client signing with a local key.
pub struct EthersChain {
    client: Client,
    address: Address,
    confirmations: usize,
}

impl EthersChain {
    pub async fn connect(
        rpc_url: &str,
        wallet: LocalWallet,
        confirmations: usize,
        poll_interval: Duration,
    ) -> Result<Self, ChainError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| ChainError::Endpoint {
                url: rpc_url.to_string(),
                reason: e.to_string(),
            })?
            .interval(poll_interval);
        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        let wallet = wallet.with_chain_id(chain_id.as_u64());
        let signer = wallet.address();

        let client = NonceManagerMiddleware::new(SignerMiddleware::new(provider, wallet), signer);
        // An uninitialized manager lets every concurrent first send fetch and reset the same count.
        let nonce = client
            .initialize_nonce(None)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;
        debug!(chain_id = %chain_id, signer = ?signer, nonce = %nonce, "connected to chain");

        Ok(Self {
            client,
            address: from_h160(signer),
            confirmations,
        })
    }

    async fn submit(&self, tx: TransactionRequest) -> Result<TransactionReceipt, ChainError> {
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| ChainError::Send(e.to_string()))?;
        let hash = pending.tx_hash();
        debug!(tx = ?hash, "transaction submitted");

        let receipt = pending
            .confirmations(self.confirmations)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?
            .ok_or(ChainError::Dropped {
                hash: from_h256(hash),
            })?;

        if receipt.status == Some(U64::zero()) {
            return Err(ChainError::Reverted {
                hash: from_h256(receipt.transaction_hash),
            });
        }
        Ok(receipt)
    }
}

#[async_trait]
impl ChainClient for EthersChain {
    fn address(&self) -> Address {
        self.address
    }

    async fn deploy(&self, label: &str, init_code: Bytes) -> Result<Deployment, ChainError> {
        debug!(contract = label, size = init_code.len(), "deploying");
        let tx = TransactionRequest::new().data(to_ethers_bytes(init_code));
        let receipt = self.submit(tx).await?;
        let tx_hash = from_h256(receipt.transaction_hash);
        let address = receipt
            .contract_address
            .map(from_h160)
            .ok_or(ChainError::MissingContractAddress { hash: tx_hash })?;
        Ok(Deployment { address, tx_hash })
    }

    async fn send(&self, call: Call) -> Result<TxOutcome, ChainError> {
        let tx = TransactionRequest::new()
            .to(to_h160(call.to))
            .value(to_ethers_u256(call.value))
            .data(to_ethers_bytes(call.data));
        let receipt = self.submit(tx).await?;
        Ok(TxOutcome {
            hash: from_h256(receipt.transaction_hash),
            block_number: receipt.block_number.map(|n| n.as_u64()),
        })
    }
}
