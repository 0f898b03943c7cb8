//! Deployment orchestration.
//!
//! # Stages
//! ```text
//! FactoryResolved → DeploySubmitted → DeployConfirmed → Cooldown → VerifySubmitted
//! ```
//!
//! The order is fixed: no branching, no retries, no rollback. A failure in
//! any stage ends the run, and a contract that was already deployed stays
//! deployed.
//!
//! The driver talks to three seams so each side effect can be substituted:
//! - [`FactoryResolver`]: named artifact → [`ContractFactory`]
//! - [`Deployer`]: broadcast the creation transaction, await its receipt
//! - [`Verifier`]: publish source for the deployed address

pub mod chain;
pub mod driver;
pub mod error;
pub mod plan;
pub mod verify;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes, TxHash};

use crate::artifacts::{ArtifactStore, ContractFactory, ContractId};
use crate::blockchain::DeployedContract;

pub use chain::ChainDeployer;
pub use driver::{DeployStage, DeploymentDriver};
pub use error::{DeployError, DeployResult};
pub use plan::{DeploymentPlan, CONTRACT_NAME, KOVAN_BALANCER_ADDRESS, VERIFICATION_COOLDOWN};
pub use verify::EtherscanVerifier;

/// Resolves a contract name to a deployable factory.
pub trait FactoryResolver {
    fn contract_factory(&self, name: &str) -> DeployResult<ContractFactory>;
}

impl FactoryResolver for ArtifactStore {
    fn contract_factory(&self, name: &str) -> DeployResult<ContractFactory> {
        Ok(ArtifactStore::contract_factory(self, name)?)
    }
}

/// Broadcasts a deployment and waits for it to be mined.
#[allow(async_fn_in_trait)]
pub trait Deployer {
    /// Send the creation transaction; spends the signer's gas.
    async fn submit(&self, factory: &ContractFactory, args: &[DynSolValue]) -> DeployResult<TxHash>;

    /// Suspend until the transaction is confirmed.
    async fn confirm(&self, tx_hash: TxHash) -> DeployResult<DeployedContract>;
}

/// Publishes a deployed contract's source to a block explorer.
#[allow(async_fn_in_trait)]
pub trait Verifier {
    async fn verify(&self, request: &VerificationRequest) -> DeployResult<VerificationOutcome>;
}

/// Input to verification.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationRequest {
    pub address: Address,
    pub contract: ContractId,
    /// The same values the contract was deployed with.
    pub constructor_args: Vec<DynSolValue>,
    /// ABI encoding of `constructor_args`.
    pub encoded_constructor_args: Bytes,
}

/// Successful verification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Source accepted by the explorer; link to the verified code.
    Verified { url: String },
    /// The explorer already had source for the address.
    AlreadyVerified { url: String },
}
