//! `deployer.yaml` settings and their resolution into a descriptor.
//!
//! Precedence, highest first: command-line flag or `DEPLOYER_*` env var,
//! settings file, built-in default.
//!
//! The settings file is looked up in this order and the first hit wins:
//! 1. `--config <file>` / `DEPLOYER_CONFIG` (must exist)
//! 2. `./deployer.yaml`
//! 3. `<config dir>/capitalisk-deployer/deployer.yaml`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use deployer_core::DeploymentDescriptor;

pub const SETTINGS_FILE: &str = "deployer.yaml";
pub const APP_DIR: &str = "capitalisk-deployer";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub repository_url: Option<String>,
    pub project_name: Option<String>,
    pub network_symbol: Option<String>,
    pub root: Option<PathBuf>,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Settings file (YAML).
    #[arg(long, global = true, env = "DEPLOYER_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory the node repository is cloned into. Defaults to the current directory.
    #[arg(long, global = true, env = "DEPLOYER_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Project name; the deployment directory is `<project>-core`.
    #[arg(long, global = true, env = "DEPLOYER_PROJECT")]
    pub project: Option<String>,

    /// Default network symbol for genesis files.
    #[arg(long, global = true, env = "DEPLOYER_NETWORK", value_name = "SYMBOL")]
    pub network: Option<String>,

    /// Git URL of the node repository.
    #[arg(long, global = true, env = "DEPLOYER_REPO", value_name = "URL")]
    pub repo: Option<String>,
}

impl GlobalArgs {
    /// Load settings from the usual places and resolve the descriptor.
    pub fn descriptor(&self) -> Result<DeploymentDescriptor> {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;
        let config_dir = dirs::config_dir().map(|d| d.join(APP_DIR));
        let settings = Settings::load_from(self.config.as_deref(), &cwd, config_dir.as_deref())?;
        self.resolve(settings)
    }

    /// Merge flags over `settings` over defaults.
    pub fn resolve(&self, settings: Settings) -> Result<DeploymentDescriptor> {
        let mut builder = DeploymentDescriptor::builder();
        if let Some(url) = self.repo.clone().or(settings.repository_url) {
            builder = builder.repository_url(url);
        }
        if let Some(project) = self.project.clone().or(settings.project_name) {
            builder = builder.project_name(project);
        }
        if let Some(network) = self.network.clone().or(settings.network_symbol) {
            builder = builder.network_symbol(network);
        }
        if let Some(root) = self.root.clone().or(settings.root) {
            builder = builder.root(root);
        }
        builder.build().context("cannot resolve deployment root")
    }
}

impl Settings {
    pub fn load_from(
        explicit: Option<&Path>,
        cwd: &Path,
        config_dir: Option<&Path>,
    ) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }
        let candidates = std::iter::once(cwd.join(SETTINGS_FILE))
            .chain(config_dir.map(|d| d.join(SETTINGS_FILE)));
        for path in candidates {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "using settings file");
                return Self::read(&path);
            }
        }
        Ok(Self::default())
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read settings file {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }
}
