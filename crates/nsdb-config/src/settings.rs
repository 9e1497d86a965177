//! File locations used by the loaders.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Environment variables (`NSDB_*`)
//!
//! # Environment Variable Mapping
//!
//! - `NSDB_LOCAL=/etc/db/database_config.json` → `local`
//! - `NSDB_GLOBAL=/etc/db/database_global.json` → `global`
//! - `NSDB_FALLBACK_LOCAL=/usr/share/db/database_config.json` → `fallback_local`
//!
//! Without `fallback_local` the local config embedded in this crate
//! ([`PACKAGED_LOCAL_CONFIG`]) stands in for a missing local file.

use std::path::PathBuf;

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DbConfigResult;

/// Runtime location of the local config file.
pub const DEFAULT_LOCAL_PATH: &str = "/var/run/redis/sonic-db/database_config.json";

/// Runtime location of the global config file.
pub const DEFAULT_GLOBAL_PATH: &str = "/var/run/redis/sonic-db/database_global.json";

/// Local config shipped with this crate, used when the runtime file is absent.
pub const PACKAGED_LOCAL_CONFIG: &str = include_str!("../config/database_config.json");

/// Where the loaders look for their files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPaths {
    /// Local config for the default namespace.
    pub local: PathBuf,

    /// Global config mapping namespaces to local-style files.
    pub global: PathBuf,

    /// Substitute for `local` when it does not exist.
    ///
    /// `None` selects [`PACKAGED_LOCAL_CONFIG`].
    #[serde(default)]
    pub fallback_local: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self {
            local: PathBuf::from(DEFAULT_LOCAL_PATH),
            global: PathBuf::from(DEFAULT_GLOBAL_PATH),
            fallback_local: None,
        }
    }
}

impl ConfigPaths {
    /// Loads the paths from built-in defaults overridden by `NSDB_*` variables.
    pub fn load() -> DbConfigResult<Self> {
        let paths: Self = Self::figment().extract()?;

        debug!(
            local = %paths.local.display(),
            global = %paths.global.display(),
            fallback_local = ?paths.fallback_local,
            "Database config paths resolved"
        );

        Ok(paths)
    }

    /// Paths rooted in a single directory, using the standard file names.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            local: dir.join("database_config.json"),
            global: dir.join("database_global.json"),
            fallback_local: None,
        }
    }

    /// Overrides the fallback local file.
    pub fn with_fallback(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_local = Some(path.into());
        self
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed("NSDB_"))
    }
}
