//! On-chain deployer backed by the JSON-RPC client.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::TxHash;
use tokio::sync::OnceCell;

use crate::artifacts::ContractFactory;
use crate::blockchain::{BlockchainClient, BlockchainError, DeployedContract, TxBuilder, Wallet};
use crate::config::ResolvedNetwork;
use crate::deploy::{DeployResult, Deployer};

/// Deploys through the selected network's endpoint and account.
///
/// The client and wallet are created on first use, so a missing endpoint or
/// key fails the deploy step rather than startup.
pub struct ChainDeployer {
    network: ResolvedNetwork,
    session: OnceCell<TxBuilder>,
}

impl ChainDeployer {
    pub fn new(network: ResolvedNetwork) -> Self {
        Self {
            network,
            session: OnceCell::new(),
        }
    }

    async fn session(&self) -> DeployResult<&TxBuilder> {
        let builder = self
            .session
            .get_or_try_init(|| async {
                let wallet = Wallet::from_network(&self.network)?;
                let client = BlockchainClient::connect(&self.network, Some(&wallet))?;
                client.verify_chain_id().await?;

                tracing::info!(
                    network = %self.network.name,
                    chain_id = self.network.settings.chain_id,
                    deployer = %wallet.address(),
                    "Connected to network"
                );
                Ok::<_, BlockchainError>(TxBuilder::new(client, wallet))
            })
            .await?;
        Ok(builder)
    }
}

impl Deployer for ChainDeployer {
    async fn submit(&self, factory: &ContractFactory, args: &[DynSolValue]) -> DeployResult<TxHash> {
        let deploy_code = factory.deploy_code(args)?;
        let session = self.session().await?;

        let tx = session.build_deployment(deploy_code).await?;
        Ok(session.send(tx).await?)
    }

    async fn confirm(&self, tx_hash: TxHash) -> DeployResult<DeployedContract> {
        let session = self.session().await?;
        let timeout_secs = self.network.settings.confirmation_timeout_secs;
        Ok(session.wait_for_confirmation(tx_hash, timeout_secs).await?)
    }
}

impl std::fmt::Debug for ChainDeployer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainDeployer")
            .field("network", &self.network)
            .field("connected", &self.session.initialized())
            .finish()
    }
}
