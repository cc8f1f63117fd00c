//! `capitalisk-deployer database create <name>`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use deployer_registrar::DatabaseOutcome;

use super::connect;
use crate::settings::GlobalArgs;

#[derive(Subcommand, Debug)]
pub enum DatabaseCommand {
    /// Create a database; an existing one with the same name is dropped first.
    Create(CreateArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    pub name: String,
}

pub fn run(cmd: DatabaseCommand, global: &GlobalArgs) -> Result<()> {
    match cmd {
        DatabaseCommand::Create(args) => create(args, global),
    }
}

fn create(args: CreateArgs, global: &GlobalArgs) -> Result<()> {
    let registrar = connect(global)?;
    let outcome = registrar
        .create_database(&args.name)
        .with_context(|| format!("failed to create database '{}'", args.name))?;
    match outcome {
        DatabaseOutcome::Created => println!("✓ Created database '{}'", args.name),
        DatabaseOutcome::Recreated => println!(
            "✓ Recreated database '{}' (it already existed; previous data dropped)",
            args.name
        ),
    }
    Ok(())
}
