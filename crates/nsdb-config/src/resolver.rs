//! Validation gate in front of every lookup.
//!
//! Every accessor goes through [`ConfigStore::ensure_ready`] before touching
//! a schema. The gate loads the local config on first use and refuses
//! namespaces, databases and instances the store does not know about.

use tracing::warn;

use crate::error::{DbConfigError, DbConfigResult};
use crate::schema::{DatabaseSpec, InstanceSpec, NamespaceSchema};
use crate::store::ConfigStore;

impl ConfigStore {
    /// Loads the local config unless the default namespace is already loaded.
    pub fn ensure_local_loaded(&self) -> DbConfigResult<()> {
        if self.is_local_loaded() {
            return Ok(());
        }
        self.load_local()
    }

    /// Checks that `namespace` can be resolved, loading the local config if needed.
    ///
    /// `None` is the unset namespace and is always rejected. A non-default
    /// namespace is only known after the global config has been loaded.
    pub fn validate_namespace(&self, namespace: Option<&str>) -> DbConfigResult<()> {
        let Some(namespace) = namespace else {
            warn!("invalid namespace name given as input");
            return Err(DbConfigError::InvalidNamespace);
        };

        if !namespace.is_empty() && !self.is_global_loaded() {
            warn!(namespace, "Load the global DB config first");
            return Err(DbConfigError::GlobalNotLoaded(namespace.to_string()));
        }

        self.ensure_local_loaded()?;

        if !self.state.read().schemas.contains_key(namespace) {
            return Err(unknown_namespace(namespace));
        }
        Ok(())
    }

    /// The gate every accessor calls first.
    pub fn ensure_ready(&self, namespace: &str) -> DbConfigResult<()> {
        self.validate_namespace(Some(namespace))
    }

    /// Checks that `name` is a database of `namespace`.
    pub fn validate_database_name(&self, name: &str, namespace: &str) -> DbConfigResult<()> {
        self.with_schema(namespace, |schema| {
            lookup_database(schema, name, namespace).map(|_| ())
        })
    }

    /// Checks that `name` is an instance of `namespace`.
    pub fn validate_instance_name(&self, name: &str, namespace: &str) -> DbConfigResult<()> {
        self.with_schema(namespace, |schema| {
            lookup_instance(schema, name, namespace).map(|_| ())
        })
    }

    /// Runs `f` against the schema of `namespace` once the gate has passed.
    pub(crate) fn with_schema<T>(
        &self,
        namespace: &str,
        f: impl FnOnce(&NamespaceSchema) -> DbConfigResult<T>,
    ) -> DbConfigResult<T> {
        self.ensure_ready(namespace)?;

        let state = self.state.read();
        // A concurrent reset can empty the store between the gate and here.
        let schema = state
            .schemas
            .get(namespace)
            .ok_or_else(|| unknown_namespace(namespace))?;
        f(schema)
    }
}

pub(crate) fn lookup_database<'a>(
    schema: &'a NamespaceSchema,
    name: &str,
    namespace: &str,
) -> DbConfigResult<&'a DatabaseSpec> {
    schema.database(name).ok_or_else(|| {
        warn!(database = name, namespace, "Not a valid database name in configuration file");
        DbConfigError::UnknownDatabase {
            name: name.to_string(),
            namespace: namespace.to_string(),
        }
    })
}

pub(crate) fn lookup_instance<'a>(
    schema: &'a NamespaceSchema,
    name: &str,
    namespace: &str,
) -> DbConfigResult<&'a InstanceSpec> {
    schema.instance(name).ok_or_else(|| {
        warn!(instance = name, namespace, "Not a valid instance name in configuration file");
        DbConfigError::UnknownInstance {
            name: name.to_string(),
            namespace: namespace.to_string(),
        }
    })
}

fn unknown_namespace(namespace: &str) -> DbConfigError {
    warn!(namespace, "Not a valid namespace name in configuration file");
    DbConfigError::UnknownNamespace(namespace.to_string())
}
