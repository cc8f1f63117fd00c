//! `capitalisk-deployer deploy | undeploy | update`

use anyhow::{Context, Result};

use deployer_registrar::DatabaseOutcome;

use super::connect;
use crate::settings::GlobalArgs;

pub fn deploy(global: &GlobalArgs) -> Result<()> {
    let mut registrar = connect(global)?;
    let report = registrar.deploy().context("deploy failed")?;

    println!("✓ Deployed {}", registrar.descriptor().dir_name());
    for db in &report.databases {
        let note = match db.outcome {
            DatabaseOutcome::Created => "created",
            DatabaseOutcome::Recreated => "recreated (previous data dropped)",
        };
        println!("  {} [{}] {}", db.database, db.owner, note);
    }
    Ok(())
}

pub fn undeploy(global: &GlobalArgs) -> Result<()> {
    let mut registrar = connect(global)?;
    registrar.undeploy().context("undeploy failed")?;
    println!("✓ Stopped {}", registrar.descriptor().dir_name());
    Ok(())
}

pub fn update(global: &GlobalArgs) -> Result<()> {
    let registrar = connect(global)?;
    registrar.update_deploy().context("update failed")?;
    println!("✓ Recreated containers for {}", registrar.descriptor().dir_name());
    Ok(())
}
