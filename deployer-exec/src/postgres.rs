//! Database administration inside the project's Postgres container.
//!
//! Commands run as `docker exec <project>-postgres runuser -l postgres -c
//! "<createdb|dropdb> -U ldpos <name>"`.

use deployer_core::DeploymentDescriptor;

use crate::compose::DOCKER;
use crate::error::ExecError;
use crate::runner::CommandSpec;

/// Administrative role the node's databases are owned by.
pub const ADMIN_ROLE: &str = "ldpos";

/// Why a `createdb` failed, as far as the deployer cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateFailure {
    AlreadyExists,
    Other,
}

/// `true` if `name` can be passed to `createdb` / `dropdb` unquoted.
///
/// The name ends up inside a `runuser -c` shell string, so only
/// identifier characters are accepted.
pub fn is_valid_database_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub fn create_database(d: &DeploymentDescriptor, name: &str) -> CommandSpec {
    admin_command(d, &format!("createdb -U {ADMIN_ROLE} {name}"))
}

pub fn drop_database(d: &DeploymentDescriptor, name: &str) -> CommandSpec {
    admin_command(d, &format!("dropdb -U {ADMIN_ROLE} {name}"))
}

fn admin_command(d: &DeploymentDescriptor, script: &str) -> CommandSpec {
    let container = d.admin_container();
    CommandSpec::new(DOCKER, d.root())
        .args(["exec", container.as_str(), "runuser", "-l", "postgres", "-c"])
        .arg(script)
}

/// Classify a failed `createdb`.
///
/// `createdb` exits 1 for every failure, so the exit code carries no signal.
/// The structured check looks for Postgres' own message
/// (`database "<name>" already exists`). Failing that, any diagnostics
/// mentioning "exists" are treated as the same condition; this fallback is a
/// heuristic and can misfire on unrelated messages containing the word.
pub fn classify_create_failure(err: &ExecError, name: &str) -> CreateFailure {
    let diagnostics = err.diagnostics();
    let exact = format!("database \"{name}\" already exists");
    if diagnostics.contains(&exact) || diagnostics.contains("exists") {
        CreateFailure::AlreadyExists
    } else {
        CreateFailure::Other
    }
}
