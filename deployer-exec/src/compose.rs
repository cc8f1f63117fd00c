//! Commands the deployer runs against git and docker-compose.
//!
//! Each helper only builds a [`CommandSpec`]; running it is the caller's job.

use deployer_core::DeploymentDescriptor;

use crate::runner::CommandSpec;

pub const GIT: &str = "git";
pub const DOCKER: &str = "docker";
pub const DOCKER_COMPOSE: &str = "docker-compose";

/// `git clone <url> <dir_name>`, run in the deployment root.
pub fn clone(d: &DeploymentDescriptor) -> CommandSpec {
    CommandSpec::new(GIT, d.root()).args(["clone", d.repository_url(), d.dir_name()])
}

/// `docker-compose build --no-cache`
///
/// Always a clean build so the images match the checked-out source tree.
pub fn build(d: &DeploymentDescriptor) -> CommandSpec {
    CommandSpec::new(DOCKER_COMPOSE, d.deployment_dir()).args(["build", "--no-cache"])
}

/// `docker-compose up -d`
pub fn up(d: &DeploymentDescriptor) -> CommandSpec {
    CommandSpec::new(DOCKER_COMPOSE, d.deployment_dir()).args(["up", "-d"])
}

/// `docker-compose up -d --force-recreate`
pub fn force_recreate(d: &DeploymentDescriptor) -> CommandSpec {
    CommandSpec::new(DOCKER_COMPOSE, d.deployment_dir()).args(["up", "-d", "--force-recreate"])
}

/// `docker-compose down`
pub fn down(d: &DeploymentDescriptor) -> CommandSpec {
    CommandSpec::new(DOCKER_COMPOSE, d.deployment_dir()).arg("down")
}

/// `docker ps --format {{.Names}}`: one running container name per line.
pub fn list_containers(d: &DeploymentDescriptor) -> CommandSpec {
    CommandSpec::new(DOCKER, d.root()).args(["ps", "--format", "{{.Names}}"])
}
