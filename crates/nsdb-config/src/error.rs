//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading database topology or resolving
/// a lookup against it.
#[derive(Error, Debug)]
pub enum DbConfigError {
    /// Neither the requested local config file nor the packaged fallback could be read.
    #[error("Could not open database config file '{}': {source}", path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file was read but its contents do not match the expected schema.
    #[error("Failed to parse database config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A parsed namespace schema is internally inconsistent.
    #[error("Invalid database config for namespace '{namespace}': {message}")]
    Validation { namespace: String, message: String },

    /// The "unset" namespace was passed where a namespace is required.
    #[error("invalid namespace name given as input")]
    InvalidNamespace,

    /// A non-default namespace was requested before the global config was loaded.
    #[error("Load the global DB config first before resolving namespace '{0}'")]
    GlobalNotLoaded(String),

    /// The namespace has no schema in the store.
    #[error("{0} is not a valid namespace name in configuration file")]
    UnknownNamespace(String),

    /// The database name is absent from the namespace's `DATABASES`.
    #[error("{name} is not a valid database name in configuration file")]
    UnknownDatabase { name: String, namespace: String },

    /// The instance name is absent from the namespace's `INSTANCES`.
    #[error("{name} is not a valid instance name in configuration file")]
    UnknownInstance { name: String, namespace: String },

    /// Path settings could not be extracted from defaults and environment.
    #[error("Failed to extract path settings: {0}")]
    Settings(#[from] figment::Error),
}

impl DbConfigError {
    /// Creates a validation error for the given namespace.
    pub fn validation(namespace: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            namespace: namespace.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for errors raised by a lookup rather than by loading.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Self::InvalidNamespace
                | Self::GlobalNotLoaded(_)
                | Self::UnknownNamespace(_)
                | Self::UnknownDatabase { .. }
                | Self::UnknownInstance { .. }
        )
    }
}

/// Result type for configuration operations.
pub type DbConfigResult<T> = Result<T, DbConfigError>;
