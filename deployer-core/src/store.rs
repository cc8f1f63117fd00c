//! JSON document store.
//!
//! Reads distinguish a file that could not be read ([`StoreError::Read`])
//! from one that is present but malformed ([`StoreError::Parse`]), so callers
//! can tell "never written" from "corrupt".
//!
//! Write flow: serialize (two-space indent) → `<name>.tmp` sibling → `rename`.
//! The `.tmp` file lives in the target's directory so the rename never
//! crosses filesystems. No locking: one deployer owns a directory at a time.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Read and deserialize the JSON document at `path`.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` as indented JSON and atomically replace `path` with it.
///
/// Missing parent directories are created.
pub fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    json.push('\n');

    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp = tmp_path(path);
    std::fs::write(&tmp, json).map_err(write_err)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(write_err(e));
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[test]
    fn write_uses_two_space_indent() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.json");
        write_document(&path, &json!({"modules": {"a": 1}})).expect("write");
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"modules\": {\n    \"a\": 1\n  }\n}\n");
    }

    #[test]
    fn write_creates_parent_dirs_and_cleans_up_tmp() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("genesis").join("mainnet").join("x-genesis.json");
        write_document(&path, &json!({"networkSymbol": "x"})).expect("write");
        assert!(path.exists());
        assert!(!tmp_path(&path).exists(), ".tmp must be gone after successful write");
    }

    #[test]
    fn missing_file_is_read_error_not_parse_error() {
        let dir = TempDir::new().expect("tempdir");
        let err = read_document::<Value>(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }), "got: {err}");
        assert!(err.is_not_found());
    }

    #[test]
    fn corrupt_file_is_parse_error_with_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_document::<Value>(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }), "got: {err}");
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("config.json"));
    }
}
