//! `capitalisk-deployer add-network <genesis.json> <module.json>`

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use deployer_core::{GenesisDocument, ModuleConfig, ProjectName};

use super::{connect, read_input};
use crate::settings::GlobalArgs;

#[derive(Args, Debug)]
pub struct AddNetworkArgs {
    /// Genesis JSON document of the chain being added.
    pub genesis: PathBuf,

    /// Module configuration JSON; must name a database under components.dal.
    pub module: PathBuf,

    /// Project the module is keyed under. Defaults to the deployment's project.
    #[arg(long, value_name = "NAME")]
    pub module_project: Option<String>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl AddNetworkArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let genesis: GenesisDocument = read_input(&self.genesis, "genesis document")?;
        let module: ModuleConfig = read_input(&self.module, "module config")?;
        let mut registrar = connect(global)?;
        let project = self
            .module_project
            .map(ProjectName::from)
            .unwrap_or_else(|| registrar.descriptor().project_name().clone());

        let report = match registrar.add_network(&genesis, &module, &project) {
            Ok(report) => report,
            Err(err) => {
                let reached = registrar
                    .add_network_cursor()
                    .map(|step| format!("last completed step: {step}"))
                    .unwrap_or_else(|| "no step completed".to_string());
                return Err(anyhow::Error::new(err)
                    .context(format!("add-network {} failed ({reached})", genesis.network_symbol)));
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }
        println!(
            "✓ Added network {} as modules.{}",
            genesis.network_symbol, report.module_key
        );
        println!("  genesis   {}", report.genesis_path.display());
        println!("  database  {} ({:?})", report.database, report.database_outcome);
        for record in &report.completed {
            println!("  {:<16} {}", record.step.to_string(), record.completed_at.to_rfc3339());
        }
        Ok(())
    }
}
