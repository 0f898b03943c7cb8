//! Build artifact formats and error definitions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use alloy::json_abi::JsonAbi;
use serde::Deserialize;
use thiserror::Error;

/// Fully qualified contract identifier (`<source path>:<contract name>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractId {
    pub source_name: String,
    pub contract_name: String,
}

impl ContractId {
    pub fn new(source_name: impl Into<String>, contract_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            contract_name: contract_name.into(),
        }
    }

    /// Split `"contracts/X.sol:X"`; `None` for a bare contract name.
    pub fn parse_qualified(name: &str) -> Option<Self> {
        let (source, contract) = name.rsplit_once(':')?;
        if source.is_empty() || contract.is_empty() {
            return None;
        }
        Some(Self::new(source, contract))
    }
}

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.source_name, self.contract_name)
    }
}

/// Compiled contract artifact (`artifacts/<source>/<Name>.json`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: JsonAbi,
    /// Creation bytecode as hex; may contain library placeholders.
    pub bytecode: String,
    /// source → library → placeholder offsets.
    #[serde(default)]
    pub link_references: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

impl ContractArtifact {
    pub fn id(&self) -> ContractId {
        ContractId::new(&self.source_name, &self.contract_name)
    }

    /// Libraries that must be linked before the bytecode is deployable.
    pub fn unlinked_libraries(&self) -> Vec<String> {
        self.link_references
            .iter()
            .flat_map(|(source, libs)| libs.keys().map(move |lib| format!("{}:{}", source, lib)))
            .collect()
    }
}

/// Debug file next to an artifact, pointing at its build-info.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugFile {
    /// Path relative to the debug file's directory.
    pub build_info: String,
}

/// Compiler invocation that produced a set of artifacts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    #[serde(default)]
    pub id: String,
    /// Short version, e.g. "0.8.10".
    pub solc_version: String,
    /// Long version, e.g. "0.8.10+commit.fc410830".
    pub solc_long_version: String,
    /// Standard JSON input given to the compiler.
    pub input: serde_json::Value,
}

/// Errors that can occur while reading artifacts or preparing deploy code.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact for contract \"{name}\" not found under {}", root.display())]
    NotFound { name: String, root: PathBuf },

    #[error("Contract name \"{name}\" is ambiguous, use one of: {}", candidates.join(", "))]
    Ambiguous { name: String, candidates: Vec<String> },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Contract {contract} needs linked libraries: {}", libraries.join(", "))]
    UnlinkedLibraries { contract: String, libraries: Vec<String> },

    #[error("Contract {0} has no creation bytecode (abstract contract or interface)")]
    NotDeployable(String),

    #[error("Contract {contract} has invalid bytecode: {reason}")]
    InvalidBytecode { contract: String, reason: String },

    #[error("Failed to encode constructor arguments for {contract}: {reason}")]
    Encoding { contract: String, reason: String },
}

/// Result type for artifact operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;
