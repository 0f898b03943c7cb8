//! Block explorer (Etherscan) integration.
//!
//! # Data Flow
//! ```text
//! deployed address + standard JSON input + encoded constructor args
//!     → client.rs getsourcecode (already verified? stop)
//!     → client.rs verifysourcecode (GUID)
//!     → client.rs checkverifystatus, polled until pass/fail
//! ```

pub mod client;
pub mod types;

pub use client::EtherscanClient;
pub use types::{ExplorerError, ExplorerResult, SourceSubmission, Submission, VerificationStatus};
