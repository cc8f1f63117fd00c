//! Deployment descriptor and on-disk layout.
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   <project>-core/                      (cloned node source tree)
//!     config.json                        (multi-module config document)
//!     docker-compose.yml                 (container manifest)
//!     genesis/mainnet/<symbol>-genesis.json
//! ```
//!
//! Every path helper here is pure; nothing touches the filesystem.

use std::path::{Path, PathBuf};

use crate::types::{NetworkSymbol, ProjectName};

pub const DEFAULT_REPOSITORY_URL: &str = "https://github.com/Capitalisk/capitalisk-core.git";
pub const DEFAULT_PROJECT_NAME: &str = "capitalisk";
pub const DEFAULT_NETWORK_SYMBOL: &str = "clsk";

/// Appended to the project name to form the deployment directory name.
pub const DIR_SUFFIX: &str = "-core";

pub const CONFIG_FILE: &str = "config.json";
pub const COMPOSE_FILE: &str = "docker-compose.yml";
pub const GENESIS_DIR: &str = "genesis/mainnet";

/// Identity and location of one deployment. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentDescriptor {
    repository_url: String,
    project_name: ProjectName,
    dir_name: String,
    network_symbol: NetworkSymbol,
    root: PathBuf,
}

impl DeploymentDescriptor {
    pub fn new(
        repository_url: impl Into<String>,
        project_name: ProjectName,
        network_symbol: NetworkSymbol,
        root: impl Into<PathBuf>,
    ) -> Self {
        let dir_name = format!("{}{DIR_SUFFIX}", project_name.0);
        Self {
            repository_url: repository_url.into(),
            project_name,
            dir_name,
            network_symbol,
            root: root.into(),
        }
    }

    pub fn builder() -> DescriptorBuilder {
        DescriptorBuilder::default()
    }

    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    pub fn project_name(&self) -> &ProjectName {
        &self.project_name
    }

    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }

    pub fn network_symbol(&self) -> &NetworkSymbol {
        &self.network_symbol
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `true` when the project name is the upstream one, so the compose
    /// manifest needs no identifier rewrite.
    pub fn is_default_project(&self) -> bool {
        self.project_name.0 == DEFAULT_PROJECT_NAME
    }

    /// `<root>/<project>-core`
    pub fn deployment_dir(&self) -> PathBuf {
        self.root.join(&self.dir_name)
    }

    /// `<root>/<project>-core/config.json`
    pub fn config_path(&self) -> PathBuf {
        self.deployment_dir().join(CONFIG_FILE)
    }

    /// `<root>/<project>-core/docker-compose.yml`
    pub fn compose_path(&self) -> PathBuf {
        self.deployment_dir().join(COMPOSE_FILE)
    }

    /// `<root>/<project>-core/genesis/mainnet/<symbol>-genesis.json`
    pub fn genesis_path(&self, symbol: &NetworkSymbol) -> PathBuf {
        self.deployment_dir()
            .join(GENESIS_DIR)
            .join(format!("{}-genesis.json", symbol.0))
    }

    /// Container running the project's database engine.
    pub fn admin_container(&self) -> String {
        self.project_name.admin_container()
    }
}

/// Builder filling unset fields with the upstream defaults.
///
/// `root` defaults to the current working directory, resolved at `build()`.
#[derive(Debug, Clone, Default)]
pub struct DescriptorBuilder {
    repository_url: Option<String>,
    project_name: Option<ProjectName>,
    network_symbol: Option<NetworkSymbol>,
    root: Option<PathBuf>,
}

impl DescriptorBuilder {
    pub fn repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = Some(url.into());
        self
    }

    pub fn project_name(mut self, name: impl Into<ProjectName>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn network_symbol(mut self, symbol: impl Into<NetworkSymbol>) -> Self {
        self.network_symbol = Some(symbol.into());
        self
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn build(self) -> std::io::Result<DeploymentDescriptor> {
        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir()?,
        };
        Ok(DeploymentDescriptor::new(
            self.repository_url
                .unwrap_or_else(|| DEFAULT_REPOSITORY_URL.to_owned()),
            self.project_name
                .unwrap_or_else(|| ProjectName::from(DEFAULT_PROJECT_NAME)),
            self.network_symbol
                .unwrap_or_else(|| NetworkSymbol::from(DEFAULT_NETWORK_SYMBOL)),
            root,
        ))
    }
}
