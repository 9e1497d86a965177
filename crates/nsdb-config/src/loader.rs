//! Reading config files from disk.
//!
//! These helpers are stateless: they read, parse and validate a file and
//! hand the result back. Deciding *whether* to load, and where the result
//! is stored, belongs to [`ConfigStore`](crate::store::ConfigStore).

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{error, trace, warn};

use crate::error::{DbConfigError, DbConfigResult};
use crate::schema::{DEFAULT_NAMESPACE, GlobalConfig, NamespaceSchema};
use crate::settings::PACKAGED_LOCAL_CONFIG;
use crate::validation::validate_schema;

/// Name reported for the embedded local config in errors and logs.
const PACKAGED_LOCAL_NAME: &str = "<packaged database_config.json>";

/// Reads the local config for the default namespace.
///
/// When `path` is not a file, `fallback` is read instead, or the embedded
/// [`PACKAGED_LOCAL_CONFIG`] when no fallback is configured. A configured
/// fallback that cannot be read is an error.
pub fn read_local(path: &Path, fallback: Option<&Path>) -> DbConfigResult<NamespaceSchema> {
    if path.is_file() {
        return read_schema(path, DEFAULT_NAMESPACE);
    }

    match fallback {
        Some(fallback) => {
            warn!(
                path = %path.display(),
                fallback = %fallback.display(),
                "Database config file is not found, it is not expected in production devices"
            );
            read_schema(fallback, DEFAULT_NAMESPACE)
        }
        None => {
            warn!(
                path = %path.display(),
                fallback = PACKAGED_LOCAL_NAME,
                "Database config file is not found, it is not expected in production devices"
            );
            let schema: NamespaceSchema =
                parse_json(PACKAGED_LOCAL_CONFIG, Path::new(PACKAGED_LOCAL_NAME))?;
            validate_schema(DEFAULT_NAMESPACE, &schema)?;
            Ok(schema)
        }
    }
}

/// Reads a local-style file and validates it as the schema of `namespace`.
pub fn read_schema(path: &Path, namespace: &str) -> DbConfigResult<NamespaceSchema> {
    let schema: NamespaceSchema = read_json(path)?;
    validate_schema(namespace, &schema)?;
    Ok(schema)
}

/// Reads the global config file.
pub fn read_global(path: &Path) -> DbConfigResult<GlobalConfig> {
    read_json(path)
}

/// Resolves an include entry relative to the directory of the global file.
pub fn resolve_include(global_path: &Path, include: &str) -> PathBuf {
    match global_path.parent() {
        Some(dir) => dir.join(include),
        None => PathBuf::from(include),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> DbConfigResult<T> {
    trace!(path = %path.display(), "Reading database config file");

    let content = fs::read_to_string(path).map_err(|source| {
        error!(path = %path.display(), error = %source, "Could not open database config file");
        DbConfigError::ConfigLoad {
            path: path.to_path_buf(),
            source,
        }
    })?;

    parse_json(&content, path)
}

fn parse_json<T: DeserializeOwned>(content: &str, path: &Path) -> DbConfigResult<T> {
    serde_json::from_str(content).map_err(|source| DbConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
