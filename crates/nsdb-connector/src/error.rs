//! Error types for the connection facade.

use nsdb_config::DbConfigError;
use thiserror::Error;

/// Errors returned by a [`DbClient`](crate::client::DbClient) implementation.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// No connection has been opened for the database.
    #[error("database '{db_name}' is not connected")]
    NotConnected { db_name: String },

    /// The operation did not complete in time.
    #[error("operation on '{db_name}' timed out")]
    Timeout { db_name: String },

    /// Any other failure reported by the key-value server or the client.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Errors that can occur in facade operations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Resolving the database's coordinates failed.
    #[error(transparent)]
    Config(#[from] DbConfigError),

    /// The external client failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The requested client option combination is not supported.
    #[error("unsupported client option: {0}")]
    Unsupported(String),
}

/// Result type for [`DbClient`](crate::client::DbClient) operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type for facade operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
