//! SimpleVoting deployer.
//!
//! # Flow
//!
//! ```text
//!   .env / environment ──▶ config (endpoint, signing key, explorer key)
//!                               │
//!                               ▼
//!   artifacts/ ──▶ factory ──▶ deploy tx ──▶ confirmation ──▶ 10s cooldown ──▶ Etherscan
//!                              (JSON-RPC)     (receipt)                        verification
//! ```
//!
//! One fixed contract, one network, once per invocation. Exit status is 0 on
//! success and 1 on any failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use voting_deployer::artifacts::ArtifactStore;
use voting_deployer::config::env::resolve_from_process;
use voting_deployer::config::loader::{load_env_file, load_or_default};
use voting_deployer::config::schema::DEFAULT_NETWORK;
use voting_deployer::deploy::{
    ChainDeployer, DeployResult, DeploymentDriver, DeploymentPlan, EtherscanVerifier,
};
use voting_deployer::observability::logging;

#[derive(Parser)]
#[command(name = "voting-deployer")]
#[command(about = "Deploy SimpleVoting and verify it on Etherscan", long_about = None)]
struct Cli {
    /// TOML file overriding the built-in network profile.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network profile to deploy to.
    #[arg(short, long, default_value = DEFAULT_NETWORK)]
    network: String,

    /// Compiled artifacts directory (overrides the config file).
    #[arg(long)]
    artifacts: Option<PathBuf>,

    /// File of KEY=value pairs loaded into the environment first.
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Deployment failed");
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> DeployResult<()> {
    let env_file = load_env_file(&cli.env_file);

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(dir) = cli.artifacts {
        config.artifacts_dir = dir.display().to_string();
    }

    logging::init(&config.observability);
    match env_file {
        Ok(()) => tracing::debug!(path = %cli.env_file.display(), "Loaded environment file"),
        Err(e) => tracing::debug!(path = %cli.env_file.display(), error = %e, "No environment file loaded"),
    }
    if let Some(path) = &cli.config {
        tracing::debug!(path = %path.display(), "Loaded configuration file");
    }
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        network = %cli.network,
        artifacts_dir = %config.artifacts_dir,
        "voting-deployer starting"
    );

    let env = resolve_from_process(&config, &cli.network)?;
    let artifacts = ArtifactStore::new(&config.artifacts_dir);

    let driver = DeploymentDriver::new(
        artifacts.clone(),
        ChainDeployer::new(env.network.clone()),
        EtherscanVerifier::new(env.explorer, env.network, artifacts, config.solidity_version.clone()),
        DeploymentPlan::simple_voting(),
    );

    let deployed = driver.run().await?;

    tracing::info!(
        address = %deployed.address,
        tx_hash = %deployed.tx_hash,
        "Deployment complete"
    );
    Ok(())
}
