//! Is the deployment's container stack running?

use std::sync::Arc;

use deployer_core::DeploymentDescriptor;

use crate::compose;
use crate::error::ExecError;
use crate::runner::ProcessRunner;

/// Capability to ask the container runtime whether a deployment is up.
///
/// Swappable so an authoritative runtime query can replace the name
/// heuristic of [`DockerPsProbe`].
pub trait ContainerProbe: Send + Sync {
    fn stack_running(&self, descriptor: &DeploymentDescriptor) -> Result<bool, ExecError>;
}

/// Lists running containers and looks for the deployment's identifiers.
///
/// A container counts if its name contains `<project>-core` or
/// `<project>-postgres`. This is a substring match: an unrelated container
/// whose name happens to contain either identifier is a false positive.
pub struct DockerPsProbe {
    runner: Arc<dyn ProcessRunner>,
}

impl DockerPsProbe {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }
}

impl ContainerProbe for DockerPsProbe {
    fn stack_running(&self, descriptor: &DeploymentDescriptor) -> Result<bool, ExecError> {
        let output = self.runner.run(&compose::list_containers(descriptor))?;
        Ok(matches_stack(&output.stdout, descriptor))
    }
}

/// `true` if any line of a container listing names this deployment.
pub fn matches_stack(listing: &str, descriptor: &DeploymentDescriptor) -> bool {
    let admin = descriptor.admin_container();
    listing
        .lines()
        .map(str::trim)
        .any(|name| name.contains(descriptor.dir_name()) || name.contains(&admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn descriptor(project: &str) -> DeploymentDescriptor {
        DeploymentDescriptor::builder()
            .project_name(project)
            .root("/srv")
            .build()
            .unwrap()
    }

    #[rstest]
    #[case("capitalisk-core_app_1\ncapitalisk-postgres\n", "capitalisk", true)]
    #[case("doge-postgres\n", "doge", true)]
    #[case("doge-core-node-1\n", "doge", true)]
    #[case("ldpos-postgres\nredis\n", "doge", false)]
    #[case("", "capitalisk", false)]
    fn listing_matches(#[case] listing: &str, #[case] project: &str, #[case] expected: bool) {
        assert_eq!(matches_stack(listing, &descriptor(project)), expected);
    }

    #[test]
    fn unrelated_container_sharing_the_identifier_is_a_false_positive() {
        // Known limitation of the substring heuristic: a foreign
        // "superdoge-core-explorer" container reads as our stack.
        let d = descriptor("doge");
        assert!(!matches_stack("dogecoin-postgres\n", &d));
        assert!(matches_stack("superdoge-core-explorer\n", &d));
    }
}
