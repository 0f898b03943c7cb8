//! Etherscan-backed verifier.

use alloy::hex;

use crate::artifacts::ArtifactStore;
use crate::blockchain::BlockchainClient;
use crate::config::{ResolvedExplorer, ResolvedNetwork};
use crate::deploy::{DeployResult, VerificationOutcome, VerificationRequest, Verifier};
use crate::explorer::{
    EtherscanClient, ExplorerError, SourceSubmission, Submission, VerificationStatus,
};

/// Verifies contracts on the selected network's Etherscan instance.
#[derive(Debug, Clone)]
pub struct EtherscanVerifier {
    explorer: ResolvedExplorer,
    network: ResolvedNetwork,
    artifacts: ArtifactStore,
    solidity_version: String,
}

impl EtherscanVerifier {
    pub fn new(
        explorer: ResolvedExplorer,
        network: ResolvedNetwork,
        artifacts: ArtifactStore,
        solidity_version: impl Into<String>,
    ) -> Self {
        Self {
            explorer,
            network,
            artifacts,
            solidity_version: solidity_version.into(),
        }
    }
}

impl Verifier for EtherscanVerifier {
    async fn verify(&self, request: &VerificationRequest) -> DeployResult<VerificationOutcome> {
        let client = EtherscanClient::new(&self.explorer)?;
        let url = client.contract_url(request.address);

        let build_info = self.artifacts.build_info(&request.contract)?;
        if build_info.solc_version != self.solidity_version {
            return Err(ExplorerError::CompilerMismatch {
                configured: self.solidity_version.clone(),
                artifact: build_info.solc_version,
            }
            .into());
        }

        let chain = BlockchainClient::connect(&self.network, None)?;
        if chain.get_code(request.address).await?.is_empty() {
            return Err(ExplorerError::NoBytecode {
                address: request.address,
                network: self.network.name.clone(),
            }
            .into());
        }

        if client.is_verified(request.address).await? {
            tracing::info!(address = %request.address, "Contract already verified");
            return Ok(VerificationOutcome::AlreadyVerified { url });
        }

        let submission = SourceSubmission {
            address: request.address,
            contract_name: request.contract.to_string(),
            compiler_version: format!("v{}", build_info.solc_long_version),
            source_code: build_info.input.to_string(),
            constructor_arguments: hex::encode(&request.encoded_constructor_args),
        };

        let guid = match client.submit(&submission).await? {
            Submission::Accepted(guid) => guid,
            Submission::AlreadyVerified => {
                return Ok(VerificationOutcome::AlreadyVerified { url });
            }
        };

        tracing::info!(
            contract = %request.contract,
            address = %request.address,
            "Waiting for verification result"
        );

        match client.wait_for_verdict(&guid, request.address).await? {
            VerificationStatus::AlreadyVerified => {
                Ok(VerificationOutcome::AlreadyVerified { url })
            }
            _ => Ok(VerificationOutcome::Verified { url }),
        }
    }
}
