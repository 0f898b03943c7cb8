//! Resolution of secrets and endpoints from the process environment.
//!
//! Values are read once and carried as `Option<String>`. Nothing is parsed or
//! validated here: a missing endpoint, key or API key only surfaces as an
//! error at the first call that actually needs it. A profile that cannot be
//! verified at all (no explorer endpoint or key variable) is rejected up
//! front, before any gas is spent.

use crate::config::loader::ConfigError;
use crate::config::schema::{DeployerConfig, EtherscanConfig, ExplorerEndpoint, NetworkConfig};

/// Network profile with its environment-backed values filled in.
#[derive(Clone)]
pub struct ResolvedNetwork {
    /// Profile name (e.g., "kovan").
    pub name: String,
    /// JSON-RPC endpoint, if the variable was set.
    pub rpc_url: Option<String>,
    /// Signing key, if the variable was set.
    pub private_key: Option<String>,
    /// Static settings of the profile.
    pub settings: NetworkConfig,
}

impl ResolvedNetwork {
    /// Name of the variable the endpoint is read from.
    pub fn url_env(&self) -> &str {
        &self.settings.url_env
    }

    /// Name of the variable the signing key is read from, if the profile has an account slot.
    pub fn account_env(&self) -> Option<&str> {
        self.settings.accounts_env.first().map(String::as_str)
    }
}

impl std::fmt::Debug for ResolvedNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedNetwork")
            .field("name", &self.name)
            .field("rpc_url_set", &self.rpc_url.is_some())
            .field("private_key_set", &self.private_key.is_some())
            .field("chain_id", &self.settings.chain_id)
            .finish()
    }
}

/// Explorer settings for the selected network.
#[derive(Clone)]
pub struct ResolvedExplorer {
    /// Network the key and endpoints belong to.
    pub network: String,
    /// API key, if the variable was set.
    pub api_key: Option<String>,
    /// Variable the key is read from, if the network has one mapped.
    pub api_key_env: Option<String>,
    /// API/browser endpoints, if the network has an explorer.
    pub endpoint: Option<ExplorerEndpoint>,
    /// Shared polling and timeout settings.
    pub settings: EtherscanConfig,
}

impl std::fmt::Debug for ResolvedExplorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedExplorer")
            .field("network", &self.network)
            .field("api_key_set", &self.api_key.is_some())
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Everything the deployment needs from configuration and environment.
#[derive(Debug, Clone)]
pub struct DeploymentEnv {
    pub network: ResolvedNetwork,
    pub explorer: ResolvedExplorer,
}

/// Resolve the named network against an environment lookup.
///
/// Fails when the network has no profile, or its profile lacks an explorer
/// endpoint or API key variable.
pub fn resolve<F>(config: &DeployerConfig, network: &str, lookup: F) -> Result<DeploymentEnv, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = config.networks.get(network).cloned().ok_or_else(|| ConfigError::UnknownNetwork {
        name: network.to_string(),
        known: config.networks.keys().cloned().collect(),
    })?;

    let rpc_url = lookup(settings.url_env.as_str());
    let private_key = settings.accounts_env.first().and_then(|var| lookup(var.as_str()));

    let api_key_env = config
        .etherscan
        .api_key_env
        .get(network)
        .cloned()
        .ok_or_else(|| ConfigError::IncompleteProfile {
            network: network.to_string(),
            missing: "explorer API key variable",
        })?;
    let endpoint = config
        .etherscan
        .endpoints
        .get(network)
        .cloned()
        .ok_or_else(|| ConfigError::IncompleteProfile {
            network: network.to_string(),
            missing: "explorer endpoint",
        })?;
    let api_key = lookup(api_key_env.as_str());

    Ok(DeploymentEnv {
        network: ResolvedNetwork {
            name: network.to_string(),
            rpc_url,
            private_key,
            settings,
        },
        explorer: ResolvedExplorer {
            network: network.to_string(),
            api_key,
            api_key_env: Some(api_key_env),
            endpoint: Some(endpoint),
            settings: config.etherscan.clone(),
        },
    })
}

/// Resolve the named network against the process environment.
pub fn resolve_from_process(config: &DeployerConfig, network: &str) -> Result<DeploymentEnv, ConfigError> {
    resolve(config, network, |var| std::env::var(var).ok())
}
