//! The deployment orchestrator.
//!
//! A [`NetworkRegistrar`] owns one deployment directory. Operations run
//! strictly one after another: each external command and each file
//! read/write completes before the next begins. Only one registrar, in one
//! process, may target a given directory and database container at a time;
//! nothing here locks.
//!
//! Every operation that writes into the deployment directory first makes
//! sure the source tree is cloned.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use deployer_core::{
    store, ConfigDocument, DeploymentDescriptor, GenesisDocument, ModuleConfig, NetworkSymbol,
    ProjectName,
};
use deployer_exec::postgres::{self, CreateFailure};
use deployer_exec::{
    compose, preflight, CommandOutput, CommandSpec, ContainerProbe, DockerPsProbe, ProcessRunner,
    SystemRunner,
};

use crate::error::DeployError;
use crate::network::{AddNetworkReport, AddNetworkStep, StepRecord};
use crate::repository::{CloneOutcome, Repository};
use crate::state::DeploymentState;

/// How `create_database` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseOutcome {
    Created,
    /// The database existed and was dropped and created again; its data is gone.
    Recreated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedDatabase {
    /// `base` or the module key that declared the database.
    pub owner: String,
    pub database: String,
    pub outcome: DatabaseOutcome,
}

/// What a successful `deploy` provisioned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    pub databases: Vec<ProvisionedDatabase>,
}

pub struct NetworkRegistrar {
    descriptor: DeploymentDescriptor,
    runner: Arc<dyn ProcessRunner>,
    probe: Box<dyn ContainerProbe>,
    state: DeploymentState,
    config: Option<ConfigDocument>,
    add_network_cursor: Option<AddNetworkStep>,
}

impl NetworkRegistrar {
    /// Check the host, then build a registrar that drives the real
    /// `git` / `docker-compose` / `docker` binaries.
    pub fn connect(descriptor: DeploymentDescriptor) -> Result<Self, DeployError> {
        preflight::check_host()?;
        let runner: Arc<dyn ProcessRunner> = Arc::new(SystemRunner);
        let probe = Box::new(DockerPsProbe::new(Arc::clone(&runner)));
        Ok(Self::with_backend(descriptor, runner, probe))
    }

    /// Build a registrar over caller-supplied collaborators. Skips host checks.
    pub fn with_backend(
        descriptor: DeploymentDescriptor,
        runner: Arc<dyn ProcessRunner>,
        probe: Box<dyn ContainerProbe>,
    ) -> Self {
        let mut registrar = Self {
            descriptor,
            runner,
            probe,
            state: DeploymentState::NotDeployed,
            config: None,
            add_network_cursor: None,
        };
        registrar.refresh_state();
        registrar
    }

    pub fn descriptor(&self) -> &DeploymentDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> DeploymentState {
        self.state
    }

    /// Last step the most recent `add_network` call completed.
    pub fn add_network_cursor(&self) -> Option<AddNetworkStep> {
        self.add_network_cursor
    }

    /// Re-derive the deployment state from the container runtime.
    ///
    /// A probe that fails is logged and read as "not deployed".
    pub fn refresh_state(&mut self) -> DeploymentState {
        self.state = match self.probe.stack_running(&self.descriptor) {
            Ok(running) => DeploymentState::from(running),
            Err(err) => {
                tracing::warn!(error = %err, "container probe failed; assuming not deployed");
                DeploymentState::NotDeployed
            }
        };
        self.state
    }

    pub fn is_cloned(&self) -> bool {
        self.repository().is_cloned()
    }

    pub fn ensure_cloned(&self) -> Result<CloneOutcome, DeployError> {
        self.repository().ensure_cloned()
    }

    // -----------------------------------------------------------------------
    // Stack lifecycle
    // -----------------------------------------------------------------------

    /// Clean-build the images, start the stack, then provision the base
    /// database and the database of every module with a dal connection.
    pub fn deploy(&mut self) -> Result<DeployReport, DeployError> {
        self.ensure_cloned()?;

        tracing::info!(dir = self.descriptor.dir_name(), "building images");
        self.exec(compose::build(&self.descriptor))?;
        tracing::info!(dir = self.descriptor.dir_name(), "starting containers");
        self.exec(compose::up(&self.descriptor))?;
        self.state = DeploymentState::Deployed;

        let config = self.get_config()?.clone();
        let mut targets = Vec::new();
        match config.base_database() {
            Some(db) => targets.push(("base".to_owned(), db.to_owned())),
            None => tracing::warn!("config has no base dal database; skipping it"),
        }
        targets.extend(config.module_databases());

        // Two owners naming one database must not drop each other's data.
        let mut seen = BTreeSet::new();
        let mut report = DeployReport::default();
        for (owner, database) in targets {
            if !seen.insert(database.clone()) {
                tracing::debug!(%owner, %database, "database already provisioned in this run");
                continue;
            }
            let outcome = self.create_database(&database)?;
            report.databases.push(ProvisionedDatabase {
                owner,
                database,
                outcome,
            });
        }
        Ok(report)
    }

    /// Stop the stack. Rejected when nothing is deployed.
    pub fn undeploy(&mut self) -> Result<(), DeployError> {
        if !self.state.is_deployed() {
            return Err(DeployError::NoDeployFound);
        }
        self.ensure_cloned()?;

        tracing::info!(dir = self.descriptor.dir_name(), "shutting down containers");
        self.runner
            .run(&compose::down(&self.descriptor))
            .map_err(|source| DeployError::ContainerNotFound { source })?;
        self.state = DeploymentState::NotDeployed;
        Ok(())
    }

    /// Recreate the running containers from the current manifest and images
    /// so they pick up configuration changes. No rebuild.
    pub fn update_deploy(&self) -> Result<(), DeployError> {
        self.ensure_cloned()?;
        tracing::info!(dir = self.descriptor.dir_name(), "recreating containers");
        self.exec(compose::force_recreate(&self.descriptor))?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Genesis and config
    // -----------------------------------------------------------------------

    /// Write `genesis` for `network_symbol` (default: the deployment's own).
    ///
    /// An existing genesis file is only reported, never protected: it is
    /// overwritten. Returns the written path.
    pub fn create_genesis(
        &self,
        genesis: &GenesisDocument,
        network_symbol: Option<&NetworkSymbol>,
    ) -> Result<PathBuf, DeployError> {
        self.ensure_cloned()?;
        let symbol = network_symbol.unwrap_or(self.descriptor.network_symbol());
        let path = self.descriptor.genesis_path(symbol);

        match store::read_document::<Value>(&path) {
            Ok(existing) => {
                let present = existing.get("networkSymbol").and_then(Value::as_str);
                if present == Some(symbol.as_str()) {
                    tracing::info!(network = %symbol, "genesis is already present; overwriting");
                }
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => tracing::debug!(error = %err, "ignoring unreadable genesis file"),
        }

        store::write_document(&path, genesis).map_err(|source| DeployError::GenesisWriteFail {
            message: source.to_string(),
            source,
        })?;
        tracing::info!(network = %symbol, path = %path.display(), "wrote genesis");
        Ok(path)
    }

    /// Read `config.json` and cache it. Each call re-reads the file.
    pub fn get_config(&mut self) -> Result<&ConfigDocument, DeployError> {
        let doc: ConfigDocument = store::read_document(&self.descriptor.config_path())?;
        Ok(self.config.insert(doc))
    }

    /// Config as of the last read or write, without touching disk.
    pub fn cached_config(&self) -> Option<&ConfigDocument> {
        self.config.as_ref()
    }

    /// Register `module` as `modules["<project>_chain"]`, replacing any
    /// previous entry for that key and leaving every other key untouched.
    ///
    /// Returns the module key.
    pub fn write_config(
        &mut self,
        module: &ModuleConfig,
        project: &ProjectName,
    ) -> Result<String, DeployError> {
        self.ensure_cloned()?;
        if module.is_empty() {
            return Err(DeployError::InvalidModuleConfig(
                "modulePath and genesisPath must be set".to_owned(),
            ));
        }

        let path = self.descriptor.config_path();
        let mut doc: ConfigDocument = store::read_document(&path)?;
        let key = project.module_key();
        let previous = doc.set_module(&key, module)?;
        store::write_document(&path, &doc)?;

        tracing::info!(module = %key, replaced = previous.is_some(), "wrote module config");
        self.config = Some(doc);
        Ok(key)
    }

    // -----------------------------------------------------------------------
    // Databases
    // -----------------------------------------------------------------------

    /// Create `name` in the project's Postgres container.
    ///
    /// If it already exists it is dropped and created again, once. Any other
    /// failure, or a failure during that recovery, is `PostgresInitFail`.
    pub fn create_database(&self, name: &str) -> Result<DatabaseOutcome, DeployError> {
        if !postgres::is_valid_database_name(name) {
            return Err(DeployError::InvalidDatabaseName(name.to_owned()));
        }
        let init_fail = |source| DeployError::PostgresInitFail {
            database: name.to_owned(),
            source,
        };

        tracing::info!(database = name, "adding database inside postgres container");
        let create = postgres::create_database(&self.descriptor, name);
        let err = match self.runner.run(&create) {
            Ok(_) => return Ok(DatabaseOutcome::Created),
            Err(err) => err,
        };

        match postgres::classify_create_failure(&err, name) {
            CreateFailure::AlreadyExists => {
                tracing::info!(database = name, "database exists; recreating it");
                self.runner
                    .run(&postgres::drop_database(&self.descriptor, name))
                    .map_err(init_fail)?;
                self.runner.run(&create).map_err(init_fail)?;
                Ok(DatabaseOutcome::Recreated)
            }
            CreateFailure::Other => Err(init_fail(err)),
        }
    }

    // -----------------------------------------------------------------------
    // Composite
    // -----------------------------------------------------------------------

    /// Onboard a chain: write its genesis (keyed by the genesis document's
    /// own network symbol), register its module config under `project`,
    /// create its database and recreate the stack.
    ///
    /// Steps run in [`AddNetworkStep::SEQUENCE`] order. A failure stops the
    /// run and leaves earlier steps in place; see
    /// [`add_network_cursor`](Self::add_network_cursor).
    pub fn add_network(
        &mut self,
        genesis: &GenesisDocument,
        module: &ModuleConfig,
        project: &ProjectName,
    ) -> Result<AddNetworkReport, DeployError> {
        if module.is_empty() {
            return Err(DeployError::InvalidModuleConfig(
                "modulePath and genesisPath must be set".to_owned(),
            ));
        }
        let database = module
            .database()
            .ok_or_else(|| {
                DeployError::InvalidModuleConfig(
                    "components.dal.connection.database is required to add a network".to_owned(),
                )
            })?
            .to_owned();
        if !postgres::is_valid_database_name(&database) {
            return Err(DeployError::InvalidDatabaseName(database));
        }

        self.add_network_cursor = None;
        let genesis_path = self.descriptor.genesis_path(&genesis.network_symbol);
        let module_key = project.module_key();
        let mut database_outcome = DatabaseOutcome::Created;
        let mut completed = Vec::with_capacity(AddNetworkStep::SEQUENCE.len());

        for step in AddNetworkStep::SEQUENCE {
            tracing::info!(%step, network = %genesis.network_symbol, "add-network step");
            match step {
                AddNetworkStep::WriteGenesis => {
                    self.create_genesis(genesis, Some(&genesis.network_symbol))?;
                }
                AddNetworkStep::WriteConfig => {
                    self.write_config(module, project)?;
                }
                AddNetworkStep::CreateDatabase => {
                    database_outcome = self.create_database(&database)?;
                }
                AddNetworkStep::RecreateStack => self.update_deploy()?,
            }
            self.add_network_cursor = Some(step);
            completed.push(StepRecord {
                step,
                completed_at: Utc::now(),
            });
        }

        Ok(AddNetworkReport {
            module_key,
            genesis_path,
            database,
            database_outcome,
            completed,
        })
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn repository(&self) -> Repository<'_> {
        Repository::new(&self.descriptor, self.runner.as_ref())
    }

    fn exec(&self, cmd: CommandSpec) -> Result<CommandOutput, DeployError> {
        Ok(self.runner.run(&cmd)?)
    }
}
