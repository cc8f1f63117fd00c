//! `capitalisk-deployer status`: deployment state and registered modules.
//!
//! Read-only: never clones, never writes, and tolerates a host without docker.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use deployer_core::{store, ConfigDocument, DeploymentDescriptor};
use deployer_exec::{ContainerProbe, DockerPsProbe, ProcessRunner, SystemRunner};
use deployer_registrar::DeploymentState;

use crate::settings::GlobalArgs;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let descriptor = global.descriptor()?;
        let runner: Arc<dyn ProcessRunner> = Arc::new(SystemRunner);
        let probe = DockerPsProbe::new(runner);
        let report = build_report(&descriptor, &probe)?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize status JSON")?
            );
            return Ok(());
        }
        print_table(&report);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct StatusReport {
    project: String,
    network: String,
    deployment_dir: String,
    cloned: bool,
    /// `None` when the container runtime could not be queried.
    state: Option<DeploymentState>,
    base_database: Option<String>,
    modules: Vec<ModuleRow>,
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct ModuleRow {
    #[tabled(rename = "module")]
    module: String,
    #[tabled(rename = "database")]
    database: String,
}

fn build_report(
    descriptor: &DeploymentDescriptor,
    probe: &dyn ContainerProbe,
) -> Result<StatusReport> {
    let cloned = descriptor.deployment_dir().is_dir();
    let state = match probe.stack_running(descriptor) {
        Ok(running) => Some(DeploymentState::from(running)),
        Err(err) => {
            tracing::debug!(error = %err, "container probe unavailable");
            None
        }
    };

    let config_path = descriptor.config_path();
    let (base_database, modules) = if config_path.exists() {
        let doc: ConfigDocument = store::read_document(&config_path)?;
        let mut databases: BTreeMap<String, String> = doc.module_databases().into_iter().collect();
        let modules = doc
            .module_keys()
            .into_iter()
            .map(|key| ModuleRow {
                database: databases.remove(&key).unwrap_or_else(|| "-".to_string()),
                module: key,
            })
            .collect();
        (doc.base_database().map(str::to_owned), modules)
    } else {
        (None, Vec::new())
    };

    Ok(StatusReport {
        project: descriptor.project_name().to_string(),
        network: descriptor.network_symbol().to_string(),
        deployment_dir: descriptor.deployment_dir().display().to_string(),
        cloned,
        state,
        base_database,
        modules,
    })
}

fn print_table(report: &StatusReport) {
    let state = match report.state {
        Some(DeploymentState::Deployed) => "DEPLOYED".green().bold().to_string(),
        Some(DeploymentState::NotDeployed) => "NOT DEPLOYED".yellow().bold().to_string(),
        None => "UNKNOWN".bright_black().bold().to_string(),
    };
    println!(
        "{} | network {} | {}",
        report.project.to_uppercase().bold(),
        report.network,
        state
    );
    println!("{}", report.deployment_dir);

    if !report.cloned {
        println!("Not cloned yet. Run 'capitalisk-deployer deploy'.");
        return;
    }
    if let Some(base) = &report.base_database {
        println!("base database: {base}");
    }
    if report.modules.is_empty() {
        println!("No modules registered.");
        return;
    }

    let mut table = Table::new(report.modules.clone());
    table.with(Style::rounded());
    println!("{table}");
}
