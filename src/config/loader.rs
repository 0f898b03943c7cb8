//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::DeployerConfig;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    UnknownNetwork { name: String, known: Vec<String> },
    IncompleteProfile { network: String, missing: &'static str },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::UnknownNetwork { name, known } => {
                write!(f, "Unknown network '{}' (configured: ", name)?;
                for (i, n) in known.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", n)?;
                }
                write!(f, ")")
            }
            ConfigError::IncompleteProfile { network, missing } => {
                write!(f, "Network '{}' has no {} configured", network, missing)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DeployerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load the file if one was named, otherwise fall back to the built-in profile.
pub fn load_or_default(path: Option<&Path>) -> Result<DeployerConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(DeployerConfig::default()),
    }
}

/// Load `KEY=value` pairs from an env file into the process environment.
///
/// Runs before logging is installed (the file may set `RUST_LOG`), so the
/// outcome is returned for the caller to log. A missing file is not an
/// error; variables already set are not overridden.
pub fn load_env_file(path: &Path) -> Result<(), dotenv::Error> {
    dotenv::from_path(path)
}
