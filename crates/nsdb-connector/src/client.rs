//! The boundary to the external key-value client.
//!
//! The facade never speaks the wire protocol. It resolves *where* a
//! database lives and hands that to a [`DbClient`], which owns connection
//! pooling, retries and the actual commands. Connection state is keyed by
//! database name on the client side.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientResult;

/// Pattern matching every key.
pub const ALL_KEYS: &str = "*";

/// How a database's instance is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// A unix domain socket path, exactly as configured.
    UnixSocket(String),
    /// A TCP host and port.
    Tcp { hostname: String, port: u16 },
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnixSocket(path) => write!(f, "unix://{path}"),
            Self::Tcp { hostname, port } => write!(f, "{hostname}:{port}"),
        }
    }
}

/// Options handed to the client with every connect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// Return values as decoded strings. Only `true` is supported.
    #[serde(default = "default_decode_responses")]
    pub decode_responses: bool,

    /// Client-specific settings passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            decode_responses: default_decode_responses(),
            extra: Map::new(),
        }
    }
}

fn default_decode_responses() -> bool {
    true
}

/// Everything a client needs to open a connection to one logical database.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectTarget {
    /// Numeric database index to select after connecting.
    pub db_id: u32,
    /// Logical name the connection is registered under.
    pub db_name: String,
    /// Where the hosting instance is reached.
    pub endpoint: Endpoint,
    /// Options the facade was built with.
    pub options: ClientOptions,
}

/// An external key-value client.
///
/// Every operation except [`connect`](DbClient::connect) addresses a
/// database by the logical name it was connected under.
#[async_trait]
pub trait DbClient: Send + Sync {
    /// Opens (or reuses) a connection for `target.db_name`.
    ///
    /// With `retry_on` set the client keeps retrying until it succeeds.
    async fn connect(&self, target: ConnectTarget, retry_on: bool) -> ClientResult<()>;

    /// Closes the connection registered under `db_name`.
    async fn close(&self, db_name: &str) -> ClientResult<()>;

    /// Publishes `message` on `channel`, returning the number of receivers.
    async fn publish(&self, db_name: &str, channel: &str, message: &str) -> ClientResult<i64>;

    /// Sets a time-to-live on `key`.
    async fn expire(&self, db_name: &str, key: &str, timeout: Duration) -> ClientResult<bool>;

    async fn exists(&self, db_name: &str, key: &str) -> ClientResult<bool>;

    /// Keys matching a glob-style `pattern`.
    async fn keys(&self, db_name: &str, pattern: &str) -> ClientResult<Vec<String>>;

    /// A single field of the hash at `hash`.
    async fn get(&self, db_name: &str, hash: &str, key: &str) -> ClientResult<Option<String>>;

    /// Every field of the hash at `hash`.
    async fn get_all(&self, db_name: &str, hash: &str) -> ClientResult<HashMap<String, String>>;

    /// Sets one field of the hash at `hash`, returning the number of fields added.
    async fn set(&self, db_name: &str, hash: &str, key: &str, value: &str) -> ClientResult<i64>;

    /// Deletes `key`, returning the number of keys removed.
    async fn delete(&self, db_name: &str, key: &str) -> ClientResult<i64>;

    /// Deletes every key matching `pattern`.
    async fn delete_all_by_pattern(&self, db_name: &str, pattern: &str) -> ClientResult<()>;
}
