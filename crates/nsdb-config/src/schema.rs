//! Database topology schema definitions.
//!
//! These types mirror the JSON layout of the local (`database_config.json`)
//! and global (`database_global.json`) files. Unknown keys are ignored so
//! that extra per-database attributes do not break parsing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of a logical database, e.g. `"APPL_DB"`.
pub type DatabaseName = String;

/// Name of a physical key-value server instance, e.g. `"redis"`.
pub type InstanceName = String;

/// Namespace key. The empty string is the namespace the process runs in.
pub type Namespace = String;

/// The namespace the process runs in.
pub const DEFAULT_NAMESPACE: &str = "";

/// A physical endpoint hosting one or more logical databases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSpec {
    /// Host name or address for TCP connections.
    pub hostname: String,

    /// TCP port.
    pub port: u16,

    /// Path of the unix domain socket, kept exactly as written in the file.
    pub unix_socket_path: String,
}

/// A logical database: its numeric index, key separator and hosting instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSpec {
    /// Numeric database index selected after connecting.
    pub id: u32,

    /// Separator between table name and key fields.
    pub separator: String,

    /// Instance this database lives on.
    pub instance: InstanceName,
}

/// The parsed contents of one local config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSchema {
    #[serde(rename = "DATABASES")]
    pub databases: BTreeMap<DatabaseName, DatabaseSpec>,

    #[serde(rename = "INSTANCES")]
    pub instances: BTreeMap<InstanceName, InstanceSpec>,
}

impl NamespaceSchema {
    /// Looks up a database entry by name.
    pub fn database(&self, name: &str) -> Option<&DatabaseSpec> {
        self.databases.get(name)
    }

    /// Looks up an instance entry by name.
    pub fn instance(&self, name: &str) -> Option<&InstanceSpec> {
        self.instances.get(name)
    }
}

/// One entry of the global config's `INCLUDES` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalInclude {
    /// Target namespace; absent means the default namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<Namespace>,

    /// Path of a local-style config file, relative to the global file's directory.
    pub include: String,
}

impl GlobalInclude {
    /// The namespace key this include loads into.
    pub fn namespace_key(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }
}

/// The parsed contents of the global config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(rename = "INCLUDES")]
    pub includes: Vec<GlobalInclude>,
}
