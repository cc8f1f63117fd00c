//! Local copy of the node source tree.
//!
//! `ensure_cloned` is idempotent: the first call clones and, for a project
//! other than the upstream default, renames the default project identifier
//! inside `docker-compose.yml` so several deployments can share one host.
//! Every later call finds the directory and does nothing, so the manifest is
//! rewritten exactly once.

use std::fs;

use deployer_core::descriptor::DEFAULT_PROJECT_NAME;
use deployer_core::DeploymentDescriptor;
use deployer_exec::{compose, ProcessRunner};

use crate::error::{io_err, DeployError};

/// Result of [`Repository::ensure_cloned`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneOutcome {
    /// The deployment directory already existed; nothing ran.
    AlreadyPresent,
    Cloned {
        manifest_rewritten: bool,
    },
}

pub struct Repository<'a> {
    descriptor: &'a DeploymentDescriptor,
    runner: &'a dyn ProcessRunner,
}

impl<'a> Repository<'a> {
    pub fn new(descriptor: &'a DeploymentDescriptor, runner: &'a dyn ProcessRunner) -> Self {
        Self { descriptor, runner }
    }

    /// The deployment directory exists and can be listed.
    pub fn is_cloned(&self) -> bool {
        fs::read_dir(self.descriptor.deployment_dir()).is_ok()
    }

    pub fn ensure_cloned(&self) -> Result<CloneOutcome, DeployError> {
        if self.is_cloned() {
            return Ok(CloneOutcome::AlreadyPresent);
        }

        let root = self.descriptor.root();
        if !root.exists() {
            fs::create_dir_all(root).map_err(|e| io_err(root, e))?;
        }

        tracing::info!(
            url = self.descriptor.repository_url(),
            dir = self.descriptor.dir_name(),
            "cloning node repository",
        );
        self.runner.run(&compose::clone(self.descriptor))?;

        if self.descriptor.is_default_project() {
            return Ok(CloneOutcome::Cloned {
                manifest_rewritten: false,
            });
        }
        self.rewrite_manifest()?;
        Ok(CloneOutcome::Cloned {
            manifest_rewritten: true,
        })
    }

    fn rewrite_manifest(&self) -> Result<(), DeployError> {
        let path = self.descriptor.compose_path();
        let manifest = fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let project = self.descriptor.project_name().as_str();

        let replacements = manifest.matches(DEFAULT_PROJECT_NAME).count();
        let rewritten = manifest.replace(DEFAULT_PROJECT_NAME, project);
        fs::write(&path, rewritten).map_err(|e| io_err(&path, e))?;

        tracing::info!(
            project,
            replacements,
            "renamed project identifiers in compose manifest",
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use deployer_exec::{CommandOutput, CommandSpec, ExecError};
    use tempfile::TempDir;

    use super::*;

    /// Pretends to be `git clone` by materialising a compose manifest.
    #[derive(Default)]
    struct CloneStub {
        calls: Mutex<Vec<String>>,
    }

    impl ProcessRunner for CloneStub {
        fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput, ExecError> {
            self.calls.lock().unwrap().push(cmd.to_string());
            let dir = cmd.cwd.join(&cmd.args[2]);
            fs::create_dir_all(&dir).unwrap();
            fs::write(
                dir.join("docker-compose.yml"),
                "services:\n  capitalisk-postgres:\n    container_name: capitalisk-postgres\n",
            )
            .unwrap();
            Ok(CommandOutput::default())
        }
    }

    fn descriptor(root: &TempDir, project: &str) -> DeploymentDescriptor {
        DeploymentDescriptor::builder()
            .project_name(project)
            .root(root.path())
            .build()
            .unwrap()
    }

    #[test]
    fn default_project_is_cloned_without_rewrite() {
        let root = TempDir::new().expect("tempdir");
        let d = descriptor(&root, "capitalisk");
        let stub = CloneStub::default();
        let outcome = Repository::new(&d, &stub).ensure_cloned().expect("clone");
        assert_eq!(
            outcome,
            CloneOutcome::Cloned {
                manifest_rewritten: false
            }
        );
        let manifest = fs::read_to_string(d.compose_path()).unwrap();
        assert!(manifest.contains("capitalisk-postgres"));
    }

    #[test]
    fn named_project_rewrites_manifest_once() {
        let root = TempDir::new().expect("tempdir");
        let d = descriptor(&root, "doge");
        let stub = CloneStub::default();
        let repo = Repository::new(&d, &stub);

        repo.ensure_cloned().expect("first");
        let after_first = fs::read_to_string(d.compose_path()).unwrap();
        assert_eq!(
            after_first,
            "services:\n  doge-postgres:\n    container_name: doge-postgres\n"
        );

        assert_eq!(repo.ensure_cloned().expect("second"), CloneOutcome::AlreadyPresent);
        assert_eq!(stub.calls.lock().unwrap().len(), 1);
        assert_eq!(fs::read_to_string(d.compose_path()).unwrap(), after_first);
    }

    #[test]
    fn missing_root_is_created_before_clone() {
        let tmp = TempDir::new().expect("tempdir");
        let d = DeploymentDescriptor::builder()
            .root(tmp.path().join("nested").join("root"))
            .build()
            .unwrap();
        let stub = CloneStub::default();
        Repository::new(&d, &stub).ensure_cloned().expect("clone");
        assert!(Repository::new(&d, &stub).is_cloned());
    }
}
