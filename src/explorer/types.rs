//! Etherscan API payloads and error definitions.

use alloy::primitives::Address;
use serde::Deserialize;
use thiserror::Error;

/// Envelope shared by every Etherscan API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    /// A string for most actions, an array for `getsourcecode`.
    pub result: serde_json::Value,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "1"
    }

    /// The result as text, or empty when it is not a string.
    pub fn result_str(&self) -> &str {
        self.result.as_str().unwrap_or_default()
    }
}

/// Source code submission for `verifysourcecode`.
#[derive(Debug, Clone)]
pub struct SourceSubmission {
    pub address: Address,
    /// `<source path>:<contract name>`.
    pub contract_name: String,
    /// Etherscan-style compiler version, e.g. "v0.8.10+commit.fc410830".
    pub compiler_version: String,
    /// Standard JSON input, serialized.
    pub source_code: String,
    /// ABI-encoded constructor arguments as hex without 0x.
    pub constructor_arguments: String,
}

/// What the explorer did with a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Queued for verification under this GUID.
    Accepted(String),
    /// The explorer already has source for the address.
    AlreadyVerified,
}

/// State of a queued verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    Pending,
    Verified,
    AlreadyVerified,
    Failed(String),
}

impl VerificationStatus {
    /// Interpret a `checkverifystatus` response.
    pub fn from_response(response: &ApiResponse) -> Option<Self> {
        let result = response.result_str();
        if result == "Pending in queue" {
            Some(Self::Pending)
        } else if result == "Pass - Verified" {
            Some(Self::Verified)
        } else if is_already_verified(result) {
            Some(Self::AlreadyVerified)
        } else if result.starts_with("Fail - Unable to verify") {
            Some(Self::Failed(result.to_string()))
        } else {
            None
        }
    }
}

pub(crate) fn is_already_verified(result: &str) -> bool {
    result == "Already Verified" || result.starts_with("Contract source code already verified")
}

pub(crate) fn is_missing_bytecode(result: &str) -> bool {
    result.starts_with("Unable to locate ContractCode at")
}

/// Errors that can occur while talking to the explorer.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// No API key in the environment for the selected network.
    #[error("Missing explorer API key for network '{network}' (environment variable {variable} not set)")]
    MissingApiKey { network: String, variable: String },

    /// The network has no explorer endpoint configured.
    #[error("No block explorer configured for network '{0}'")]
    UnsupportedNetwork(String),

    /// Malformed endpoint URL in configuration.
    #[error("Invalid explorer URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport or HTTP status failure.
    #[error("Explorer request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error.
    #[error("Explorer {action} request rejected: {message} ({result})")]
    Api {
        action: &'static str,
        message: String,
        result: String,
    },

    /// The explorer has not indexed the contract yet.
    #[error("Explorer has no bytecode for {0} yet; it may not have indexed the deployment")]
    NotIndexed(Address),

    /// The chain reports no code at the address.
    #[error("No bytecode at {address} on network '{network}'")]
    NoBytecode { address: Address, network: String },

    /// Artifacts were built with a different compiler than configured.
    #[error("Compiler version mismatch: configured {configured}, artifacts built with {artifact}")]
    CompilerMismatch { configured: String, artifact: String },

    /// The explorer rejected the source.
    #[error("Verification of {address} failed: {reason}")]
    VerificationFailed { address: Address, reason: String },

    /// No verdict within the configured bound.
    #[error("No verification verdict for request {guid} after {waited_secs} seconds")]
    Timeout { guid: String, waited_secs: u64 },
}

/// Result type for explorer operations.
pub type ExplorerResult<T> = Result<T, ExplorerError>;
