//! `capitalisk-deployer config show` and `capitalisk-deployer config write <module.json>`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use deployer_core::{store, ConfigDocument, ModuleConfig, ProjectName};

use super::{connect, read_input};
use crate::settings::GlobalArgs;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the deployment's config.json. Does not clone.
    Show,

    /// Register a module entry as `modules["<project>_chain"]`.
    Write(WriteArgs),
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Module configuration JSON.
    pub module: PathBuf,

    /// Project the module is keyed under. Defaults to the deployment's project.
    #[arg(long, value_name = "NAME")]
    pub module_project: Option<String>,
}

pub fn run(cmd: ConfigCommand, global: &GlobalArgs) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show(global),
        ConfigCommand::Write(args) => write(args, global),
    }
}

fn show(global: &GlobalArgs) -> Result<()> {
    let descriptor = global.descriptor()?;
    let path = descriptor.config_path();
    if !path.exists() {
        bail!(
            "{} does not exist; run `capitalisk-deployer deploy` first",
            path.display()
        );
    }
    let doc: ConfigDocument = store::read_document(&path)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&doc).context("failed to serialize config")?
    );
    Ok(())
}

fn write(args: WriteArgs, global: &GlobalArgs) -> Result<()> {
    let module: ModuleConfig = read_input(&args.module, "module config")?;
    let mut registrar = connect(global)?;
    let project = args
        .module_project
        .map(ProjectName::from)
        .unwrap_or_else(|| registrar.descriptor().project_name().clone());
    let key = registrar
        .write_config(&module, &project)
        .context("failed to write module config")?;
    println!(
        "✓ Registered modules.{key} in {}",
        registrar.descriptor().config_path().display()
    );
    Ok(())
}
