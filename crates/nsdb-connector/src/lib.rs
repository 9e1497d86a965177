//! Namespace-aware connection facade for nsdb.
//!
//! This crate binds a [`Connector`] to one namespace and routes connection
//! and data operations for that namespace's logical databases to an
//! external [`DbClient`]. Coordinates come from
//! [`nsdb_config::ConfigStore`]; the key-value protocol, pooling and
//! retries are the client's business.

pub mod client;
pub mod connector;
pub mod error;

pub use client::{ALL_KEYS, ClientOptions, ConnectTarget, DbClient, Endpoint};
pub use connector::{Addressing, Connector, ConnectorOptions};
pub use error::{ClientError, ClientResult, ConnectorError, ConnectorResult};
