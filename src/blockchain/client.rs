//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint of the selected network
//! - Query chain state (chain id, block number, nonce, gas price, code, receipts)
//! - Broadcast signed transactions through a wallet-backed provider
//! - Bound every call with the configured timeout

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::wallet::Wallet;
use crate::config::{NetworkConfig, ResolvedNetwork};

/// Blockchain RPC client bound to one endpoint.
#[derive(Clone)]
pub struct BlockchainClient {
    /// Provider for the endpoint (signing when built with a wallet).
    provider: Arc<dyn Provider + Send + Sync>,
    /// Network name, for logs.
    network: String,
    /// Endpoint URL.
    rpc_url: String,
    /// Profile settings.
    config: NetworkConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a client for a resolved network.
    ///
    /// # Arguments
    /// * `network` - Network profile with its environment values
    /// * `wallet` - Signer to attach; `None` gives a read-only client
    ///
    /// # Returns
    /// A new client, or `NotAvailable` if the endpoint variable was not set.
    /// No request is made here.
    pub fn connect(network: &ResolvedNetwork, wallet: Option<&Wallet>) -> BlockchainResult<Self> {
        let rpc_url = network.rpc_url.clone().ok_or_else(|| {
            BlockchainError::NotAvailable(format!(
                "no RPC endpoint configured for network '{}' (environment variable {} not set)",
                network.name,
                network.url_env()
            ))
        })?;

        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;

        let provider: Arc<dyn Provider + Send + Sync> = match wallet {
            Some(wallet) => Arc::new(
                ProviderBuilder::new()
                    .wallet(wallet.ethereum_wallet())
                    .connect_http(url),
            ),
            None => Arc::new(ProviderBuilder::new().connect_http(url)),
        };

        tracing::debug!(
            network = %network.name,
            chain_id = network.settings.chain_id,
            signing = wallet.is_some(),
            "Blockchain client created"
        );

        Ok(Self {
            provider,
            network: network.name.clone(),
            rpc_url,
            config: network.settings.clone(),
            timeout_duration: Duration::from_secs(network.settings.rpc_timeout_secs),
        })
    }

    /// Run one RPC call under the client's timeout.
    async fn call<T, E, F>(&self, method: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(network = %self.network, method, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{} failed: {}", method, e)))
            }
            Err(_) => {
                tracing::warn!(network = %self.network, method, "RPC timeout");
                Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
            }
        }
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.call("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.call("eth_blockNumber", self.provider.get_block_number()).await
    }

    /// Get the transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        self.call("eth_getTransactionCount", self.provider.get_transaction_count(address))
            .await
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.call("eth_gasPrice", self.provider.get_gas_price()).await
    }

    /// Estimate gas for a transaction request.
    pub async fn estimate_gas(&self, tx: TransactionRequest) -> BlockchainResult<u64> {
        self.call("eth_estimateGas", self.provider.estimate_gas(tx)).await
    }

    /// Get the runtime bytecode at an address.
    pub async fn get_code(&self, address: Address) -> BlockchainResult<Bytes> {
        self.call("eth_getCode", self.provider.get_code_at(address)).await
    }

    /// Sign (through the attached wallet) and broadcast a transaction.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let pending = self
            .call("eth_sendRawTransaction", self.provider.send_transaction(tx))
            .await?;
        Ok(*pending.tx_hash())
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.call("eth_getTransactionReceipt", self.provider.get_transaction_receipt(tx_hash))
            .await
    }

    /// Get the profile settings.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Get the number of confirmation blocks required.
    pub fn confirmation_blocks(&self) -> u32 {
        self.config.confirmation_blocks
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
