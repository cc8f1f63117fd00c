use std::fmt;

use thiserror::Error;

/// An external command that could not be spawned or exited non-zero.
///
/// Carries the rendered command line and whatever the process printed, so
/// callers can report it verbatim or classify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecError {
    pub command: String,
    /// Exit code; `None` when the process never started or was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecError {
    /// What the command said about its failure: stderr, or stdout when stderr is empty.
    pub fn diagnostics(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "command `{}` failed (exit {code})", self.command)?,
            None => write!(f, "command `{}` failed", self.command)?,
        }
        let diagnostics = self.diagnostics();
        if !diagnostics.is_empty() {
            write!(f, ": {diagnostics}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ExecError {}

/// The host cannot run a deployment at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("{os} is not supported yet")]
    UnsupportedPlatform { os: String },

    #[error("`{tool}` was not found on PATH. {hint}")]
    ToolMissing { tool: String, hint: String },
}
