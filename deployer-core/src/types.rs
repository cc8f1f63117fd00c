//! Domain types for a Capitalisk deployment.
//!
//! Documents that live on disk (`config.json`, genesis files) keep every key
//! they were read with: typed fields cover what the deployer reads or writes,
//! everything else rides along in a flattened `extra` map.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name a deployment is namespaced under (e.g. `capitalisk`, `doge`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectName(pub String);

impl ProjectName {
    /// Key of this project's entry in the `modules` map: `<project>_chain`.
    pub fn module_key(&self) -> String {
        format!("{}_chain", self.0)
    }

    /// Project-scoped container running the database engine.
    pub fn admin_container(&self) -> String {
        format!("{}-postgres", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Ticker-style identifier of a network (e.g. `clsk`, `ldpos`, `doge`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkSymbol(pub String);

impl NetworkSymbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NetworkSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for NetworkSymbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NetworkSymbol {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Module config
// ---------------------------------------------------------------------------

/// Database port, kept in whichever JSON form it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Port {
    Number(u16),
    Text(String),
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Number(n) => n.fmt(f),
            Port::Text(s) => s.fmt(f),
        }
    }
}

/// Database connection descriptor of a data-access layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbConnection {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: Port,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Data-access-layer component of a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lib_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub connection: DbConnection,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Logger component of a module.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console_log_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_log_level: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModuleComponents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logger: Option<LoggerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dal: Option<DalConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One chain module registered in the multi-module config document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    #[serde(default)]
    pub module_path: String,
    #[serde(default)]
    pub genesis_path: String,
    #[serde(default)]
    pub components: ModuleComponents,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModuleConfig {
    /// A module config missing its load path or its genesis path is empty.
    pub fn is_empty(&self) -> bool {
        self.module_path.trim().is_empty() || self.genesis_path.trim().is_empty()
    }

    /// Name of the database this module's data-access layer connects to.
    pub fn database(&self) -> Option<&str> {
        self.components
            .dal
            .as_ref()
            .map(|dal| dal.connection.database.as_str())
    }
}

// ---------------------------------------------------------------------------
// Genesis
// ---------------------------------------------------------------------------

/// One account record of a genesis document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisAccount {
    pub address: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forging_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_forging_key_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multisig_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_multisig_key_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_sig_key_index: Option<u64>,
    pub balance: String,
    #[serde(default)]
    pub votes: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Initial state a network starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisDocument {
    pub network_symbol: NetworkSymbol,
    #[serde(default)]
    pub accounts: Vec<GenesisAccount>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Multi-module config document
// ---------------------------------------------------------------------------

/// The node's `config.json`.
///
/// Held as an ordered JSON object so a read-modify-write cycle leaves every
/// key the deployer does not own exactly where it was. `modules` and `base`,
/// when present, must be objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ConfigDocument(Map<String, Value>);

const MODULES: &str = "modules";
const BASE: &str = "base";
const DAL_DATABASE: &str = "/components/dal/connection/database";

impl TryFrom<Map<String, Value>> for ConfigDocument {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        for key in [MODULES, BASE] {
            match map.get(key) {
                None | Some(Value::Object(_)) => {}
                Some(other) => {
                    return Err(format!("`{key}` must be an object, found {}", kind_of(other)))
                }
            }
        }
        Ok(Self(map))
    }
}

impl From<ConfigDocument> for Map<String, Value> {
    fn from(doc: ConfigDocument) -> Self {
        doc.0
    }
}

impl ConfigDocument {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Module keys in document order.
    pub fn module_keys(&self) -> Vec<String> {
        self.modules()
            .map(|modules| modules.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn module(&self, key: &str) -> Option<&Value> {
        self.modules().and_then(|modules| modules.get(key))
    }

    /// Create or fully replace `modules[key]`; sibling keys are untouched.
    ///
    /// Returns the previous value of the key, if any.
    pub fn set_module(
        &mut self,
        key: &str,
        config: &ModuleConfig,
    ) -> Result<Option<Value>, serde_json::Error> {
        let value = serde_json::to_value(config)?;
        let modules = self
            .0
            .entry(MODULES)
            .or_insert_with(|| Value::Object(Map::new()));
        // `try_from` guarantees an object; a document built via `default()` gets one above.
        match modules {
            Value::Object(map) => Ok(map.insert(key.to_owned(), value)),
            other => {
                *other = Value::Object(Map::from_iter([(key.to_owned(), value)]));
                Ok(None)
            }
        }
    }

    /// Database of the shared `base` data-access connection.
    pub fn base_database(&self) -> Option<&str> {
        self.0
            .get(BASE)
            .and_then(|base| base.pointer(DAL_DATABASE))
            .and_then(Value::as_str)
    }

    /// `(module key, database)` for every module that declares a dal connection.
    pub fn module_databases(&self) -> Vec<(String, String)> {
        let Some(modules) = self.modules() else {
            return vec![];
        };
        modules
            .iter()
            .filter_map(|(key, module)| {
                module
                    .pointer(DAL_DATABASE)
                    .and_then(Value::as_str)
                    .map(|db| (key.clone(), db.to_owned()))
            })
            .collect()
    }

    fn modules(&self) -> Option<&Map<String, Value>> {
        self.0.get(MODULES).and_then(Value::as_object)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doge_module() -> ModuleConfig {
        serde_json::from_value(json!({
            "modulePath": "node_modules/doge-chain",
            "genesisPath": "genesis/mainnet/doge-genesis.json",
            "components": {
                "logger": { "logFileName": "logs/mainnet/doge.log", "consoleLogLevel": "debug" },
                "dal": {
                    "libPath": "node_modules/doge-pg-dal",
                    "client": "pg",
                    "connection": {
                        "host": "127.0.0.1", "user": "doge", "password": "doge",
                        "database": "doge_main", "port": "5432"
                    }
                }
            }
        }))
        .expect("module config")
    }

    #[test]
    fn derived_identifiers() {
        let p = ProjectName::from("doge");
        assert_eq!(p.module_key(), "doge_chain");
        assert_eq!(p.admin_container(), "doge-postgres");
        assert_eq!(p.to_string(), "doge");
    }

    #[test]
    fn module_config_preserves_port_form_and_unknown_keys() {
        let mut raw = serde_json::to_value(doge_module()).unwrap();
        raw["components"]["dal"]["connection"]["ssl"] = json!(true);
        raw["custom"] = json!({"a": 1});

        let parsed: ModuleConfig = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.components.dal.as_ref().unwrap().connection.port, Port::Text("5432".into()));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), raw);
    }

    #[test]
    fn module_config_emptiness() {
        assert!(!doge_module().is_empty());
        let empty: ModuleConfig = serde_json::from_value(json!({})).unwrap();
        assert!(empty.is_empty());
        assert_eq!(doge_module().database(), Some("doge_main"));
        assert_eq!(empty.database(), None);
    }

    #[test]
    fn config_document_rejects_non_object_modules() {
        let err = serde_json::from_value::<ConfigDocument>(json!({"modules": []})).unwrap_err();
        assert!(err.to_string().contains("`modules` must be an object"), "got: {err}");
    }

    #[test]
    fn set_module_creates_modules_map_when_missing() {
        let mut doc: ConfigDocument = serde_json::from_value(json!({"base": {}})).unwrap();
        let prev = doc.set_module("doge_chain", &doge_module()).unwrap();
        assert!(prev.is_none());
        assert_eq!(doc.module_keys(), vec!["doge_chain".to_string()]);
        assert_eq!(
            doc.module_databases(),
            vec![("doge_chain".to_string(), "doge_main".to_string())]
        );
    }

    #[test]
    fn base_database_is_read_from_base_dal_connection() {
        let doc: ConfigDocument = serde_json::from_value(json!({
            "base": { "components": { "dal": { "connection": { "database": "capitalisk_main" } } } },
            "modules": {}
        }))
        .unwrap();
        assert_eq!(doc.base_database(), Some("capitalisk_main"));
        assert!(ConfigDocument::default().base_database().is_none());
    }

    #[test]
    fn genesis_document_roundtrip_keeps_account_type() {
        let raw = json!({
            "networkSymbol": "doge",
            "accounts": [{
                "address": "doge71bcc5cd9c8cf5dc2c79d235ed5f2393b5ad56cb",
                "type": "sig",
                "nextForgingKeyIndex": 0,
                "balance": "10000000000000000",
                "votes": ["doge71bcc5cd9c8cf5dc2c79d235ed5f2393b5ad56cb"]
            }]
        });
        let g: GenesisDocument = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(g.network_symbol, NetworkSymbol::from("doge"));
        assert_eq!(g.accounts[0].kind.as_deref(), Some("sig"));
        assert_eq!(serde_json::to_value(&g).unwrap(), raw);
    }
}
