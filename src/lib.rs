//! SimpleVoting deployment and explorer verification.

pub mod artifacts;
pub mod blockchain;
pub mod config;
pub mod deploy;
pub mod explorer;
pub mod observability;

pub use config::schema::DeployerConfig;
pub use deploy::{DeploymentDriver, DeploymentPlan};
