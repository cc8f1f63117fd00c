//! Deployment orchestration for a multi-network Capitalisk node.
//!
//! [`NetworkRegistrar`] is the entry point: it owns one deployment directory
//! and sequences clone, build, configuration, genesis and database steps.

mod error;
pub mod network;
pub mod registrar;
pub mod repository;
pub mod state;

pub use error::DeployError;
pub use network::{AddNetworkReport, AddNetworkStep, StepRecord};
pub use registrar::{DatabaseOutcome, DeployReport, NetworkRegistrar, ProvisionedDatabase};
pub use repository::{CloneOutcome, Repository};
pub use state::DeploymentState;
