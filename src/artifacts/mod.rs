//! Compiled contract artifacts.
//!
//! # Data Flow
//! ```text
//! artifacts/ directory (produced by the compile step)
//!     → store.rs (locate <Name>.json, follow .dbg.json to build-info)
//!     → factory.rs (ABI + creation bytecode → deploy code)
//! ```
//!
//! Compiling sources is out of scope; a missing artifact is an error.

pub mod factory;
pub mod store;
pub mod types;

pub use factory::ContractFactory;
pub use store::ArtifactStore;
pub use types::{ArtifactError, ArtifactResult, BuildInfo, ContractArtifact, ContractId};
