//! Step list for onboarding a network.
//!
//! `add_network` runs these steps in order with no rollback. The registrar
//! records the last completed step so a failed run leaves a precise marker
//! of how far it got.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::registrar::DatabaseOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddNetworkStep {
    WriteGenesis,
    WriteConfig,
    CreateDatabase,
    RecreateStack,
}

impl AddNetworkStep {
    /// Execution order.
    pub const SEQUENCE: [AddNetworkStep; 4] = [
        AddNetworkStep::WriteGenesis,
        AddNetworkStep::WriteConfig,
        AddNetworkStep::CreateDatabase,
        AddNetworkStep::RecreateStack,
    ];

    /// Step that runs after this one, if any.
    pub fn next(self) -> Option<AddNetworkStep> {
        let idx = Self::SEQUENCE.iter().position(|s| *s == self)?;
        Self::SEQUENCE.get(idx + 1).copied()
    }
}

impl fmt::Display for AddNetworkStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AddNetworkStep::WriteGenesis => "write-genesis",
            AddNetworkStep::WriteConfig => "write-config",
            AddNetworkStep::CreateDatabase => "create-database",
            AddNetworkStep::RecreateStack => "recreate-stack",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: AddNetworkStep,
    pub completed_at: DateTime<Utc>,
}

/// What a successful `add_network` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddNetworkReport {
    pub module_key: String,
    pub genesis_path: PathBuf,
    pub database: String,
    pub database_outcome: DatabaseOutcome,
    pub completed: Vec<StepRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_genesis_config_database_recreate() {
        let mut step = Some(AddNetworkStep::WriteGenesis);
        let mut walked = vec![];
        while let Some(s) = step {
            walked.push(s);
            step = s.next();
        }
        assert_eq!(walked, AddNetworkStep::SEQUENCE);
    }

    #[test]
    fn display_labels() {
        assert_eq!(AddNetworkStep::CreateDatabase.to_string(), "create-database");
    }
}
