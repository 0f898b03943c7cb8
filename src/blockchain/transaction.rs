//! Deployment transaction building, broadcast and confirmation monitoring.
//!
//! # Responsibilities
//! - Build contract-creation transactions with gas estimation and a gas price cap
//! - Sign and broadcast through the wallet-backed client
//! - Poll receipts until the required confirmation depth

use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ConfirmationStatus, DeployedContract};
use crate::blockchain::wallet::Wallet;

const GWEI: u128 = 1_000_000_000;

/// Transaction builder for contract deployments.
pub struct TxBuilder {
    client: BlockchainClient,
    wallet: Wallet,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(client: BlockchainClient, wallet: Wallet) -> Self {
        Self { client, wallet }
    }

    /// Build a contract-creation transaction.
    ///
    /// # Arguments
    /// * `deploy_code` - Creation bytecode followed by ABI-encoded constructor arguments
    pub async fn build_deployment(&self, deploy_code: Bytes) -> BlockchainResult<TransactionRequest> {
        let nonce = self.client.get_transaction_count(self.wallet.address()).await?;

        let gas_price = self.client.get_gas_price().await?;
        let config = self.client.config();
        let adjusted_gas_price =
            capped_gas_price(gas_price, config.gas_price_multiplier, config.max_gas_price_gwei)?;

        let tx = TransactionRequest::default()
            .with_from(self.wallet.address())
            .with_deploy_code(deploy_code)
            .with_nonce(nonce)
            .with_gas_price(adjusted_gas_price)
            .with_chain_id(self.wallet.chain_id());

        let gas_limit = self.client.estimate_gas(tx.clone()).await?;

        tracing::debug!(
            nonce,
            gas_limit,
            gas_price_wei = adjusted_gas_price,
            "Deployment transaction built"
        );

        Ok(tx.with_gas_limit(gas_limit))
    }

    /// Sign and broadcast a transaction.
    pub async fn send(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let tx_hash = self.client.send_transaction(tx).await?;
        tracing::info!(tx_hash = %tx_hash, from = %self.wallet.address(), "Transaction broadcast");
        Ok(tx_hash)
    }

    /// Wait for a deployment transaction to be confirmed.
    ///
    /// # Arguments
    /// * `tx_hash` - Transaction hash to monitor
    /// * `timeout_secs` - Maximum time to wait for confirmation
    pub async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
        timeout_secs: u64,
    ) -> BlockchainResult<DeployedContract> {
        let required_confirmations = self.client.confirmation_blocks();
        let timeout_duration = Duration::from_secs(timeout_secs);
        let poll_interval = Duration::from_millis(self.client.config().poll_interval_ms.max(1));

        let result = timeout(timeout_duration, async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.client.get_transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, status = ?ConfirmationStatus::Pending, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Err(BlockchainError::Reverted(format!(
                        "deployment transaction {} reverted",
                        tx_hash
                    )));
                }

                let current_block = self.client.get_block_number().await?;
                let tx_block = receipt.block_number().unwrap_or(current_block);

                match confirmation_status(current_block, tx_block, required_confirmations) {
                    ConfirmationStatus::Confirmed { block_number } => {
                        let address = receipt
                            .contract_address()
                            .ok_or(BlockchainError::MissingContractAddress(tx_hash))?;
                        return Ok(DeployedContract {
                            address,
                            tx_hash,
                            block_number,
                        });
                    }
                    status => tracing::debug!(
                        tx_hash = %tx_hash,
                        status = ?status,
                        "Waiting for confirmations"
                    ),
                }
            }
        })
        .await;

        match result {
            Ok(deployed) => deployed,
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                tx_hash,
                required: required_confirmations,
                waited_secs: timeout_secs,
            }),
        }
    }
}

/// Apply the multiplier to the node's gas price and enforce the cap on the
/// price that will actually be submitted.
pub fn capped_gas_price(node_price_wei: u128, multiplier: f64, max_gwei: u64) -> BlockchainResult<u128> {
    let adjusted = (node_price_wei as f64 * multiplier) as u128;
    let max_wei = max_gwei as u128 * GWEI;

    if adjusted > max_wei {
        return Err(BlockchainError::GasPriceTooHigh {
            current_gwei: u64::try_from(adjusted / GWEI).unwrap_or(u64::MAX),
            max_gwei,
        });
    }
    Ok(adjusted)
}

/// Classify a mined transaction by its depth.
///
/// The block containing the transaction counts as the first confirmation.
pub fn confirmation_status(current_block: u64, tx_block: u64, required: u32) -> ConfirmationStatus {
    let confirmations = current_block.saturating_sub(tx_block).saturating_add(1);
    let confirmations = u32::try_from(confirmations).unwrap_or(u32::MAX);

    if confirmations >= required {
        ConfirmationStatus::Confirmed {
            block_number: tx_block,
        }
    } else {
        ConfirmationStatus::Confirming {
            current: confirmations,
            required,
        }
    }
}
