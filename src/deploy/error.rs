//! Deployment error type.
//!
//! Every subsystem error passes through unchanged so the process boundary
//! reports exactly what the failing call said.

use thiserror::Error;

use crate::artifacts::ArtifactError;
use crate::blockchain::BlockchainError;
use crate::config::ConfigError;
use crate::explorer::ExplorerError;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error(transparent)]
    Explorer(#[from] ExplorerError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type for deployment operations.
pub type DeployResult<T> = Result<T, DeployError>;
