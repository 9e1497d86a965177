//! # nsdb
//!
//! Resolve and connect to logically-named key-value databases across
//! network namespaces.
//!
//! ## Overview
//!
//! ```text
//! database_global.json ──▶ ┌─────────────┐      ┌───────────┐      ┌──────────┐
//!   (namespace → file)     │ ConfigStore │ ───▶ │ Connector │ ───▶ │ DbClient │──▶ server
//! database_config.json ──▶ │ (per ns)    │      │ (one ns)  │      │ (extern) │
//!                          └─────────────┘      └───────────┘      └──────────┘
//! ```
//!
//! - **ConfigStore**: loads the local and global config files and answers
//!   lookups such as socket path, host, port, database index and separator.
//! - **Connector**: for one namespace, turns a logical database name into a
//!   connect request and forwards data operations.
//! - **DbClient**: the external key-value client you plug in.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nsdb::prelude::*;
//!
//! let store = ConfigStore::shared();
//! store.load_global()?;
//!
//! let connector = Connector::new(
//!     store,
//!     MyRedisClient::default(),
//!     ConnectorOptions::default().namespace("asic0"),
//! )?;
//! connector.connect("APPL_DB", true).await?;
//! ```
//!
//! ## Features
//!
//! - `json-log`: JSON output for [`logging::LoggingBuilder`](config::logging::LoggingBuilder)

pub use nsdb_config as config;
pub use nsdb_connector as connector;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use nsdb_config::{
        ConfigPaths, ConfigStore, DEFAULT_NAMESPACE, DatabaseSpec, DbConfigError, DbConfigResult,
        InstanceSpec, NamespaceSchema,
    };
    pub use nsdb_connector::{
        ALL_KEYS, Addressing, ClientError, ClientOptions, ClientResult, ConnectTarget, Connector,
        ConnectorError, ConnectorOptions, ConnectorResult, DbClient, Endpoint,
    };
}
