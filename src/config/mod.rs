//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in profile (schema.rs defaults)
//!     or config file (TOML) → loader.rs (parse & deserialize)
//!     → DeployerConfig (immutable)
//!
//! .env file → loader.rs (seed process environment)
//!     → env.rs (read endpoint, signing key, explorer key once)
//!     → DeploymentEnv (values are Option, never validated here)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; the defaults are the Kovan deployment profile
//! - Secrets are referenced by variable name, never stored in config files
//! - Absent secrets are not a loader error

pub mod env;
pub mod loader;
pub mod schema;

pub use env::{DeploymentEnv, ResolvedExplorer, ResolvedNetwork};
pub use loader::ConfigError;
pub use schema::DeployerConfig;
pub use schema::EtherscanConfig;
pub use schema::ExplorerEndpoint;
pub use schema::NetworkConfig;
