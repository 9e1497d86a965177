//! The namespace → schema store and its two loaders.
//!
//! A [`ConfigStore`] starts empty. The local loader fills the default
//! namespace (`""`); the global loader fills any namespace listed in the
//! global config. Both loaders run at most once per store: their readiness
//! flags only ever move from `false` to `true` until [`ConfigStore::reset`].
//!
//! A namespace key, once stored, is never overwritten.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::error::DbConfigResult;
use crate::loader;
use crate::schema::{DEFAULT_NAMESPACE, Namespace, NamespaceSchema};
use crate::settings::ConfigPaths;

static SHARED: OnceLock<Arc<ConfigStore>> = OnceLock::new();

#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) schemas: BTreeMap<Namespace, NamespaceSchema>,
    pub(crate) local_loaded: bool,
    pub(crate) global_loaded: bool,
}

/// Per-namespace database topology with lazy loading.
///
/// Loaders take the write lock for the whole load, so concurrent first
/// calls are serialized and only one of them reads the files.
#[derive(Debug)]
pub struct ConfigStore {
    paths: ConfigPaths,
    pub(crate) state: RwLock<StoreState>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(ConfigPaths::default())
    }
}

impl ConfigStore {
    /// Creates an empty store reading from `paths`.
    pub fn new(paths: ConfigPaths) -> Self {
        Self {
            paths,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Returns the process-wide store.
    ///
    /// Built on first use from [`ConfigPaths::load`]; if the environment
    /// cannot be extracted the built-in paths are used.
    pub fn shared() -> Arc<ConfigStore> {
        SHARED
            .get_or_init(|| {
                let paths = ConfigPaths::load().unwrap_or_else(|e| {
                    warn!(error = %e, "Falling back to default database config paths");
                    ConfigPaths::default()
                });
                Arc::new(ConfigStore::new(paths))
            })
            .clone()
    }

    /// The file locations this store loads from.
    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    /// Whether the default namespace has been loaded (or claimed by the global loader).
    pub fn is_local_loaded(&self) -> bool {
        self.state.read().local_loaded
    }

    /// Whether the global config has been processed.
    pub fn is_global_loaded(&self) -> bool {
        self.state.read().global_loaded
    }

    /// Drops every schema and clears both readiness flags.
    pub fn reset(&self) {
        let mut state = self.state.write();
        *state = StoreState::default();
        debug!("Database config store reset");
    }

    /// Loads the local config from the configured path.
    pub fn load_local(&self) -> DbConfigResult<()> {
        self.load_local_from(&self.paths.local)
    }

    /// Loads `path` as the schema of the default namespace.
    ///
    /// Does nothing once the default namespace is loaded. A missing `path` is
    /// replaced by the configured fallback file, or by the config embedded in
    /// this crate when none is configured. If the configured fallback cannot
    /// be read either, the error is returned and the store is left untouched.
    pub fn load_local_from(&self, path: impl AsRef<Path>) -> DbConfigResult<()> {
        let mut state = self.state.write();
        if state.local_loaded {
            return Ok(());
        }

        let path = path.as_ref();
        let schema = loader::read_local(path, self.paths.fallback_local.as_deref())?;
        let databases = schema.databases.len();
        insert_schema(&mut state, DEFAULT_NAMESPACE, schema);
        state.local_loaded = true;

        info!(path = %path.display(), databases, "Loaded local database config");
        Ok(())
    }

    /// Loads every namespace listed in the configured global file.
    pub fn load_global(&self) -> DbConfigResult<()> {
        self.load_global_from(&self.paths.global, None)
    }

    /// Loads the includes of the global file at `path`.
    ///
    /// With `namespace` set, only the first include for that namespace is
    /// loaded and the remaining entries are not looked at. Either way the
    /// global config counts as loaded afterwards, so a targeted load leaves
    /// other namespaces unresolvable until [`reset`](Self::reset).
    ///
    /// Missing global or include files are logged and skipped. Unreadable or
    /// malformed files are returned as errors.
    pub fn load_global_from(
        &self,
        path: impl AsRef<Path>,
        namespace: Option<&str>,
    ) -> DbConfigResult<()> {
        let mut state = self.state.write();
        if state.global_loaded {
            return Ok(());
        }

        let path = path.as_ref();
        if path.is_file() {
            let global = loader::read_global(path)?;

            for entry in &global.includes {
                let ns = entry.namespace_key();

                if namespace.is_some_and(|target| target != ns) {
                    continue;
                }

                if ns.is_empty() && state.local_loaded {
                    debug!("Default namespace already loaded, skipping global include");
                    continue;
                }

                if state.schemas.contains_key(ns) {
                    warn!(namespace = ns, "The database config for this namespace is already parsed");
                    continue;
                }

                let include = loader::resolve_include(path, &entry.include);
                if !include.is_file() {
                    warn!(namespace = ns, path = %include.display(), "Database config include file is not found");
                    continue;
                }

                // Claim the default namespace before reading so a later
                // local load never replaces it.
                if ns.is_empty() {
                    state.local_loaded = true;
                }

                let schema = loader::read_schema(&include, ns)?;
                info!(namespace = ns, path = %include.display(), "Loaded namespace database config");
                insert_schema(&mut state, ns, schema);

                if namespace.is_some() {
                    break;
                }
            }
        } else {
            warn!(path = %path.display(), "Global database config file is not found");
        }

        state.global_loaded = true;
        Ok(())
    }
}

fn insert_schema(state: &mut StoreState, namespace: &str, schema: NamespaceSchema) {
    if state.schemas.contains_key(namespace) {
        warn!(namespace, "The database config for this namespace is already parsed");
        return;
    }
    state.schemas.insert(namespace.to_string(), schema);
}
