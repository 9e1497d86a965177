//! Namespace-aware database topology for nsdb.
//!
//! A host may run several isolated network namespaces, each with its own
//! set of key-value server instances. This crate answers one question:
//! *what are the connection coordinates and schema metadata for logical
//! database X in namespace N?*
//!
//! # Files
//!
//! - The **local** config (`database_config.json`) describes the namespace
//!   the process runs in. It is loaded lazily on the first lookup; when the
//!   runtime file is missing, a packaged copy is used.
//! - The optional **global** config (`database_global.json`) lists
//!   `{namespace, include}` entries pointing at local-style files for the
//!   other namespaces. Non-default namespaces only resolve after
//!   [`ConfigStore::load_global`] has run.
//!
//! # Example
//!
//! ```rust,ignore
//! use nsdb_config::ConfigStore;
//!
//! let store = ConfigStore::shared();
//! store.load_global()?;
//!
//! let socket = store.socket_path("APPL_DB", "asic0")?;
//! let id = store.db_id("APPL_DB", "asic0")?;
//! ```

mod accessors;
pub mod error;
pub mod loader;
pub mod logging;
mod resolver;
pub mod schema;
pub mod settings;
pub mod store;
pub mod validation;

pub use error::{DbConfigError, DbConfigResult};
pub use schema::{
    DEFAULT_NAMESPACE, DatabaseName, DatabaseSpec, GlobalConfig, GlobalInclude, InstanceName,
    InstanceSpec, Namespace, NamespaceSchema,
};
pub use settings::ConfigPaths;
pub use store::ConfigStore;
pub use validation::validate_schema;
