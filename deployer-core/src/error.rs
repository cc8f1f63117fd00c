//! Error types for deployer-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from reading or writing JSON documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read (missing, permission denied, etc.).
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not valid JSON for the expected shape.
    #[error("failed to parse the JSON content of {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The value could not be serialized.
    #[error("failed to serialize document for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The serialized document could not be persisted.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Path of the document the failure relates to.
    pub fn path(&self) -> &PathBuf {
        match self {
            StoreError::Read { path, .. }
            | StoreError::Parse { path, .. }
            | StoreError::Serialize { path, .. }
            | StoreError::Write { path, .. } => path,
        }
    }

    /// `true` when the document has simply never been written.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
