//! Sequential deploy-then-verify driver.

use std::io::Write;

use crate::blockchain::DeployedContract;
use crate::deploy::plan::DeploymentPlan;
use crate::deploy::{
    DeployResult, Deployer, FactoryResolver, VerificationOutcome, VerificationRequest, Verifier,
};

/// Stage reached by the driver, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStage {
    FactoryResolved,
    DeploySubmitted,
    DeployConfirmed,
    Cooldown,
    VerifySubmitted,
}

impl std::fmt::Display for DeployStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeployStage::FactoryResolved => "factory-resolved",
            DeployStage::DeploySubmitted => "deploy-submitted",
            DeployStage::DeployConfirmed => "deploy-confirmed",
            DeployStage::Cooldown => "cooldown",
            DeployStage::VerifySubmitted => "verify-submitted",
        };
        f.write_str(name)
    }
}

/// Runs one deployment plan against a resolver, deployer and verifier.
pub struct DeploymentDriver<R, D, V> {
    resolver: R,
    deployer: D,
    verifier: V,
    plan: DeploymentPlan,
}

impl<R, D, V> DeploymentDriver<R, D, V>
where
    R: FactoryResolver,
    D: Deployer,
    V: Verifier,
{
    pub fn new(resolver: R, deployer: D, verifier: V, plan: DeploymentPlan) -> Self {
        Self {
            resolver,
            deployer,
            verifier,
            plan,
        }
    }

    /// Run the plan, writing operator lines to stdout.
    pub async fn run(&self) -> DeployResult<DeployedContract> {
        let mut stdout = std::io::stdout();
        self.run_with_output(&mut stdout).await
    }

    /// Run the plan, writing operator lines to `out`.
    pub async fn run_with_output<W: Write>(&self, out: &mut W) -> DeployResult<DeployedContract> {
        let plan = &self.plan;

        let factory = self.resolver.contract_factory(&plan.contract_name)?;
        tracing::info!(stage = %DeployStage::FactoryResolved, contract = %factory.id(), "Contract factory resolved");

        let tx_hash = self.deployer.submit(&factory, &plan.constructor_args).await?;
        tracing::info!(stage = %DeployStage::DeploySubmitted, tx_hash = %tx_hash, "Deployment submitted");

        let deployed = self.deployer.confirm(tx_hash).await?;
        tracing::info!(
            stage = %DeployStage::DeployConfirmed,
            address = %deployed.address,
            block_number = deployed.block_number,
            "Deployment confirmed"
        );
        writeln!(out, "Contract Address: {}", deployed.address)?;

        writeln!(out, "Sleeping.....")?;
        tracing::info!(stage = %DeployStage::Cooldown, cooldown_ms = plan.cooldown.as_millis() as u64, "Waiting for explorer to index");
        tokio::time::sleep(plan.cooldown).await;

        let request = VerificationRequest {
            address: deployed.address,
            contract: factory.id().clone(),
            constructor_args: plan.constructor_args.clone(),
            encoded_constructor_args: factory.encode_constructor_args(&plan.constructor_args)?,
        };
        tracing::info!(stage = %DeployStage::VerifySubmitted, address = %request.address, "Verifying contract");

        let outcome = match self.verifier.verify(&request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    address = %deployed.address,
                    error = %e,
                    "Verification failed; the contract stays deployed"
                );
                return Err(e);
            }
        };

        match outcome {
            VerificationOutcome::Verified { url } => {
                writeln!(out, "Successfully verified contract {} on the block explorer.", factory.id().contract_name)?;
                writeln!(out, "{}", url)?;
            }
            VerificationOutcome::AlreadyVerified { url } => {
                writeln!(out, "The contract {} has already been verified.", deployed.address)?;
                writeln!(out, "{}", url)?;
            }
        }

        Ok(deployed)
    }
}
