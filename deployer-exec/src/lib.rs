//! External-process plumbing: command execution, host preflight, the
//! docker-compose / Postgres command catalogue, and container-state probing.

pub mod compose;
mod error;
pub mod postgres;
pub mod preflight;
pub mod probe;
pub mod runner;

pub use error::{EnvironmentError, ExecError};
pub use probe::{ContainerProbe, DockerPsProbe};
pub use runner::{CommandOutput, CommandSpec, ProcessRunner, SystemRunner};
