//! Configuration schema definitions.
//!
//! The `Default` of every type here is the built-in deployment profile, so an
//! absent config file means "deploy to Kovan exactly as compiled in". A TOML
//! file may override any subset of fields. Keyed tables (networks, explorer
//! keys and endpoints) are merged over the built-in entries, so adding a
//! network never removes the Kovan one.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Name of the only network profile shipped by default.
pub const DEFAULT_NETWORK: &str = "kovan";

/// Root configuration for the deployer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeployerConfig {
    /// Solidity compiler version the artifacts were built with.
    pub solidity_version: String,

    /// Directory holding the compiled build artifacts.
    pub artifacts_dir: String,

    /// Network profiles keyed by name.
    #[serde(deserialize_with = "merge_networks")]
    pub networks: BTreeMap<String, NetworkConfig>,

    /// Block explorer (Etherscan) settings.
    pub etherscan: EtherscanConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for DeployerConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(DEFAULT_NETWORK.to_string(), NetworkConfig::default());

        Self {
            solidity_version: "0.8.10".to_string(),
            artifacts_dir: "artifacts".to_string(),
            networks,
            etherscan: EtherscanConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// A single network profile: where to send transactions and who signs them.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Environment variable holding the JSON-RPC endpoint URL.
    pub url_env: String,

    /// Environment variables holding account private keys. Only the first is used.
    pub accounts_env: Vec<String>,

    /// Chain ID (42 for Kovan).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations to wait for (1 = mined).
    pub confirmation_blocks: u32,

    /// Upper bound on the confirmation wait in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Gas price multiplier (1.0 = node estimate, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            url_env: "ALCHEMY_API_KEY_URL".to_string(),
            accounts_env: vec!["KOVAN_PRIVATE_KEY".to_string()],
            chain_id: 42,
            rpc_timeout_secs: 30,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 600,
            poll_interval_ms: 2000,
            gas_price_multiplier: 1.0,
            max_gas_price_gwei: 500,
        }
    }
}

/// Etherscan verification settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EtherscanConfig {
    /// Environment variable holding the API key, per network name.
    #[serde(deserialize_with = "merge_api_key_env")]
    pub api_key_env: BTreeMap<String, String>,

    /// API and browser endpoints, per network name.
    #[serde(deserialize_with = "merge_endpoints")]
    pub endpoints: BTreeMap<String, ExplorerEndpoint>,

    /// Interval between verification status checks in milliseconds.
    pub poll_interval_ms: u64,

    /// Upper bound on waiting for a verification verdict in seconds.
    pub verification_timeout_secs: u64,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for EtherscanConfig {
    fn default() -> Self {
        let mut api_key_env = BTreeMap::new();
        api_key_env.insert(DEFAULT_NETWORK.to_string(), "ETHERSCAN_KEY".to_string());

        let mut endpoints = BTreeMap::new();
        endpoints.insert(
            DEFAULT_NETWORK.to_string(),
            ExplorerEndpoint {
                api_url: "https://api-kovan.etherscan.io/api".to_string(),
                browser_url: "https://kovan.etherscan.io".to_string(),
            },
        );

        Self {
            api_key_env,
            endpoints,
            poll_interval_ms: 3000,
            verification_timeout_secs: 120,
            request_timeout_secs: 30,
        }
    }
}

fn merge_networks<'de, D>(deserializer: D) -> Result<BTreeMap<String, NetworkConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut merged = DeployerConfig::default().networks;
    merged.extend(BTreeMap::<String, NetworkConfig>::deserialize(deserializer)?);
    Ok(merged)
}

fn merge_api_key_env<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut merged = EtherscanConfig::default().api_key_env;
    merged.extend(BTreeMap::<String, String>::deserialize(deserializer)?);
    Ok(merged)
}

fn merge_endpoints<'de, D>(deserializer: D) -> Result<BTreeMap<String, ExplorerEndpoint>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut merged = EtherscanConfig::default().endpoints;
    merged.extend(BTreeMap::<String, ExplorerEndpoint>::deserialize(deserializer)?);
    Ok(merged)
}

/// Explorer endpoints for one network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExplorerEndpoint {
    /// REST API base (e.g., "https://api-kovan.etherscan.io/api").
    pub api_url: String,

    /// Human-facing site used for links.
    pub browser_url: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "voting_deployer=info".to_string(),
        }
    }
}
