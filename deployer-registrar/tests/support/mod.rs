//! Scripted process runner shared by the registrar integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use deployer_core::{DeploymentDescriptor, GenesisDocument, ModuleConfig};
use deployer_exec::{
    CommandOutput, CommandSpec, ContainerProbe, DockerPsProbe, ExecError, ProcessRunner,
};
use deployer_registrar::NetworkRegistrar;
use serde_json::{json, Value};
use tempfile::TempDir;

pub const UPSTREAM_MANIFEST: &str = "\
services:
  capitalisk-core:
    container_name: capitalisk-core
    depends_on: [capitalisk-postgres]
  capitalisk-postgres:
    container_name: capitalisk-postgres
";

/// `config.json` as shipped by the upstream repository.
pub fn upstream_config() -> Value {
    json!({
        "base": {
            "components": {
                "dal": {
                    "connection": {
                        "host": "127.0.0.1", "user": "ldpos", "password": "ldpos",
                        "database": "capitalisk_main", "port": "5432"
                    }
                }
            }
        },
        "modules": {
            "capitalisk_chain": module_json("clsk"),
            "ldpos_chain": module_json("ldpos")
        }
    })
}

pub fn module_json(symbol: &str) -> Value {
    json!({
        "modulePath": format!("node_modules/{symbol}-chain"),
        "genesisPath": format!("genesis/mainnet/{symbol}-genesis.json"),
        "components": {
            "logger": {
                "logFileName": format!("logs/mainnet/{symbol}.log"),
                "consoleLogLevel": "debug",
                "fileLogLevel": "error"
            },
            "dal": {
                "libPath": format!("node_modules/{symbol}-pg-dal"),
                "client": "pg",
                "connection": {
                    "host": "127.0.0.1", "user": symbol, "password": symbol,
                    "database": format!("{symbol}_main"), "port": "5432"
                }
            }
        }
    })
}

pub fn module(symbol: &str) -> ModuleConfig {
    serde_json::from_value(module_json(symbol)).expect("module config")
}

pub fn genesis(symbol: &str) -> GenesisDocument {
    serde_json::from_value(json!({
        "networkSymbol": symbol,
        "accounts": [{
            "address": format!("{symbol}71bcc5cd9c8cf5dc2c79d235ed5f2393b5ad56cb"),
            "type": "sig",
            "forgingPublicKey": "218a928a7c8c21f7820d3bb198e41d5175886891334f4cb900062a5acb880458",
            "nextForgingKeyIndex": 0,
            "multisigPublicKey": "4826718943ce648ce1999549179f85df45a2477c6a51f07c656c6dc18b6a9ddf",
            "nextMultisigKeyIndex": 0,
            "sigPublicKey": "71bcc5cd9c8cf5dc2c79d235ed5f2393b5ad56cb9b3f4b0102e7e32c804c0a5a",
            "nextSigKeyIndex": 0,
            "balance": "10000000000000000",
            "votes": [format!("{symbol}71bcc5cd9c8cf5dc2c79d235ed5f2393b5ad56cb")]
        }]
    }))
    .expect("genesis")
}

struct Failure {
    needle: String,
    stderr: String,
}

#[derive(Default)]
struct Script {
    calls: Vec<String>,
    failures: Vec<Failure>,
    containers: String,
}

/// Records every command and answers it from a script.
///
/// - `git clone` creates the target directory with the upstream manifest
///   and config.
/// - `docker ps` prints the configured container listing.
/// - A command containing a registered needle fails once with that stderr.
/// - Everything else succeeds silently.
#[derive(Default)]
pub struct FakeRunner {
    script: Mutex<Script>,
}

impl FakeRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The next command whose rendering contains `needle` fails with `stderr`.
    pub fn fail_once(&self, needle: &str, stderr: &str) {
        self.script.lock().unwrap().failures.push(Failure {
            needle: needle.to_owned(),
            stderr: stderr.to_owned(),
        });
    }

    pub fn set_containers(&self, listing: &str) {
        self.script.lock().unwrap().containers = listing.to_owned();
    }

    pub fn calls(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn clear(&self) {
        self.script.lock().unwrap().calls.clear();
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput, ExecError> {
        let rendered = cmd.to_string();
        let mut script = self.script.lock().unwrap();
        script.calls.push(rendered.clone());

        if let Some(idx) = script
            .failures
            .iter()
            .position(|f| rendered.contains(&f.needle))
        {
            let failure = script.failures.remove(idx);
            return Err(ExecError {
                command: rendered,
                status: Some(1),
                stdout: String::new(),
                stderr: failure.stderr,
            });
        }

        if cmd.program == "git" && cmd.args.first().map(String::as_str) == Some("clone") {
            materialise_clone(&cmd.cwd.join(&cmd.args[2]));
        }

        let stdout = if cmd.program == "docker" && cmd.args.first().map(String::as_str) == Some("ps") {
            script.containers.clone()
        } else {
            String::new()
        };
        Ok(CommandOutput {
            stdout,
            stderr: String::new(),
        })
    }
}

fn materialise_clone(dir: &Path) {
    fs::create_dir_all(dir).expect("clone dir");
    fs::write(dir.join("docker-compose.yml"), UPSTREAM_MANIFEST).expect("manifest");
    fs::write(
        dir.join("config.json"),
        serde_json::to_string_pretty(&upstream_config()).unwrap(),
    )
    .expect("config");
}

/// Probe whose runtime query always fails.
pub struct BrokenProbe;

impl ContainerProbe for BrokenProbe {
    fn stack_running(&self, _: &DeploymentDescriptor) -> Result<bool, ExecError> {
        Err(ExecError {
            command: "docker ps".into(),
            status: Some(1),
            stdout: String::new(),
            stderr: "Cannot connect to the Docker daemon".into(),
        })
    }
}

pub fn descriptor(root: &TempDir, project: &str, network: &str) -> DeploymentDescriptor {
    DeploymentDescriptor::builder()
        .project_name(project)
        .network_symbol(network)
        .root(root.path())
        .build()
        .expect("descriptor")
}

/// Registrar over a [`FakeRunner`], probing through `docker ps`.
/// The construction-time probe is cleared from the call log.
pub fn registrar(root: &TempDir, project: &str, network: &str) -> (NetworkRegistrar, Arc<FakeRunner>) {
    registrar_with_containers(root, project, network, "")
}

pub fn registrar_with_containers(
    root: &TempDir,
    project: &str,
    network: &str,
    containers: &str,
) -> (NetworkRegistrar, Arc<FakeRunner>) {
    let runner = FakeRunner::new();
    runner.set_containers(containers);
    let dyn_runner: Arc<dyn ProcessRunner> = runner.clone();
    let probe = Box::new(DockerPsProbe::new(Arc::clone(&dyn_runner)));
    let registrar = NetworkRegistrar::with_backend(descriptor(root, project, network), dyn_runner, probe);
    runner.clear();
    (registrar, runner)
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).expect("read")).expect("json")
}
