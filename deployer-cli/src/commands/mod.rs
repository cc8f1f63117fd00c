pub mod add_network;
pub mod config;
pub mod database;
pub mod genesis;
pub mod lifecycle;
pub mod status;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use deployer_core::store;
use deployer_registrar::NetworkRegistrar;

use crate::settings::GlobalArgs;

/// Resolve settings and connect to the host's container tooling.
pub(crate) fn connect(global: &GlobalArgs) -> Result<NetworkRegistrar> {
    let descriptor = global.descriptor()?;
    NetworkRegistrar::connect(descriptor).context("host is not ready for deployment")
}

/// Read a JSON input document given on the command line.
pub(crate) fn read_input<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    store::read_document(path).with_context(|| format!("failed to load {what}"))
}
