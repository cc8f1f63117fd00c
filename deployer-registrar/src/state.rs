use std::fmt;

use serde::Serialize;

/// Whether the deployment's container stack is running.
///
/// Derived from a probe when a registrar is built and updated after
/// successful deploy/undeploy calls. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    #[default]
    NotDeployed,
    Deployed,
}

impl DeploymentState {
    pub fn is_deployed(self) -> bool {
        self == DeploymentState::Deployed
    }
}

impl From<bool> for DeploymentState {
    fn from(running: bool) -> Self {
        if running {
            DeploymentState::Deployed
        } else {
            DeploymentState::NotDeployed
        }
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentState::NotDeployed => write!(f, "not deployed"),
            DeploymentState::Deployed => write!(f, "deployed"),
        }
    }
}
