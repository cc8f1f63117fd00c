//! `capitalisk-deployer genesis <file> [--network <symbol>]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use deployer_core::GenesisDocument;

use super::{connect, read_input};
use crate::settings::GlobalArgs;

#[derive(Args, Debug)]
pub struct GenesisArgs {
    /// Genesis JSON document.
    pub file: PathBuf,
}

impl GenesisArgs {
    /// The target file is keyed by the deployment's network symbol
    /// (`--network`, settings file, or `clsk`).
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let genesis: GenesisDocument = read_input(&self.file, "genesis document")?;
        let registrar = connect(global)?;
        let path = registrar
            .create_genesis(&genesis, None)
            .context("failed to write genesis")?;
        println!("✓ Wrote {}", path.display());
        Ok(())
    }
}
