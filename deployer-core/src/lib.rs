//! Deployer core library: domain types, deployment layout, JSON document store.
//!
//! Public API surface:
//! - [`descriptor`]: [`DeploymentDescriptor`] and the derived on-disk layout
//! - [`types`]: newtypes, module config, genesis and config documents
//! - [`store`]: read / write JSON documents
//! - [`error`]: [`StoreError`]

pub mod descriptor;
pub mod error;
pub mod store;
pub mod types;

pub use descriptor::{DeploymentDescriptor, DescriptorBuilder};
pub use error::StoreError;
pub use types::{
    ConfigDocument, DalConfig, DbConnection, GenesisAccount, GenesisDocument, LoggerConfig,
    ModuleComponents, ModuleConfig, NetworkSymbol, Port, ProjectName,
};
