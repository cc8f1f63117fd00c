//! Error types for deployer-registrar.

use std::path::PathBuf;

use thiserror::Error;

use deployer_core::StoreError;
use deployer_exec::{EnvironmentError, ExecError};

/// All errors a deployment operation can surface.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Host cannot run deployments (unsupported OS, missing tool).
    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    /// An external command failed and no operation-specific meaning applies.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// `config.json` unreadable, malformed or unwritable.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `undeploy` called while no stack is deployed.
    #[error("unable to run undeploy: no container is deployed")]
    NoDeployFound,

    /// Stopping the stack failed.
    #[error("container not found: {source}")]
    ContainerNotFound {
        #[source]
        source: ExecError,
    },

    #[error("error writing genesis file: {message}")]
    GenesisWriteFail {
        message: String,
        #[source]
        source: StoreError,
    },

    /// Database provisioning failed for a reason other than "already exists".
    #[error("failed to create database `{database}` in the postgres container: {source}")]
    PostgresInitFail {
        database: String,
        #[source]
        source: ExecError,
    },

    #[error("invalid database name `{0}`: use letters, digits, `_` or `-`")]
    InvalidDatabaseName(String),

    #[error("invalid module config: {0}")]
    InvalidModuleConfig(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DeployError {
    DeployError::Io {
        path: path.into(),
        source,
    }
}
