//! The fixed deployment this tool performs.

use std::time::Duration;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{address, Address};

/// Artifact name of the contract being deployed.
pub const CONTRACT_NAME: &str = "SimpleVoting";

/// Balancer (BAL) token on Kovan, the voting weight token.
pub const KOVAN_BALANCER_ADDRESS: Address = address!("41286Bb1D3E870f3F750eB7E1C25d7E48c8A1Ac7");

/// Pause between confirmation and verification so the explorer can index the contract.
pub const VERIFICATION_COOLDOWN: Duration = Duration::from_millis(10_000);

/// What to deploy and with which constructor arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentPlan {
    pub contract_name: String,
    pub constructor_args: Vec<DynSolValue>,
    pub cooldown: Duration,
}

impl DeploymentPlan {
    /// `SimpleVoting(KOVAN_BALANCER_ADDRESS)`.
    pub fn simple_voting() -> Self {
        Self {
            contract_name: CONTRACT_NAME.to_string(),
            constructor_args: vec![DynSolValue::Address(KOVAN_BALANCER_ADDRESS)],
            cooldown: VERIFICATION_COOLDOWN,
        }
    }
}
