//! Namespace-scoped lookups.
//!
//! All accessors take the database or instance name and a namespace (`""`
//! for the default one), pass the [`ensure_ready`](ConfigStore::ensure_ready)
//! gate and read from the namespace's schema. Values are returned exactly as
//! parsed.

use std::collections::BTreeMap;

use crate::error::DbConfigResult;
use crate::resolver::{lookup_database, lookup_instance};
use crate::schema::{DatabaseName, DatabaseSpec, InstanceName, InstanceSpec, Namespace};
use crate::store::ConfigStore;

impl ConfigStore {
    /// Names of every logical database in `namespace`.
    pub fn database_names(&self, namespace: &str) -> DbConfigResult<Vec<DatabaseName>> {
        self.with_schema(namespace, |schema| {
            Ok(schema.databases.keys().cloned().collect())
        })
    }

    /// Names of every instance in `namespace`.
    pub fn instance_names(&self, namespace: &str) -> DbConfigResult<Vec<InstanceName>> {
        self.with_schema(namespace, |schema| {
            Ok(schema.instances.keys().cloned().collect())
        })
    }

    /// The full instance map of `namespace`.
    pub fn instances(&self, namespace: &str) -> DbConfigResult<BTreeMap<InstanceName, InstanceSpec>> {
        self.with_schema(namespace, |schema| Ok(schema.instances.clone()))
    }

    /// Every namespace currently loaded, loading the local config first.
    pub fn namespace_names(&self) -> DbConfigResult<Vec<Namespace>> {
        self.ensure_local_loaded()?;
        Ok(self.state.read().schemas.keys().cloned().collect())
    }

    /// The `DATABASES` entry for `db_name`.
    pub fn database(&self, db_name: &str, namespace: &str) -> DbConfigResult<DatabaseSpec> {
        self.with_schema(namespace, |schema| {
            lookup_database(schema, db_name, namespace).cloned()
        })
    }

    /// Name of the instance `db_name` lives on.
    pub fn instance_name(&self, db_name: &str, namespace: &str) -> DbConfigResult<InstanceName> {
        self.with_schema(namespace, |schema| {
            let db = lookup_database(schema, db_name, namespace)?;
            lookup_instance(schema, &db.instance, namespace)?;
            Ok(db.instance.clone())
        })
    }

    /// The instance `db_name` lives on.
    pub fn instance(&self, db_name: &str, namespace: &str) -> DbConfigResult<InstanceSpec> {
        self.with_schema(namespace, |schema| {
            let db = lookup_database(schema, db_name, namespace)?;
            lookup_instance(schema, &db.instance, namespace).cloned()
        })
    }

    /// Unix socket path of the instance hosting `db_name`.
    pub fn socket_path(&self, db_name: &str, namespace: &str) -> DbConfigResult<String> {
        Ok(self.instance(db_name, namespace)?.unix_socket_path)
    }

    /// Hostname of the instance hosting `db_name`.
    pub fn hostname(&self, db_name: &str, namespace: &str) -> DbConfigResult<String> {
        Ok(self.instance(db_name, namespace)?.hostname)
    }

    /// Port of the instance hosting `db_name`.
    pub fn port(&self, db_name: &str, namespace: &str) -> DbConfigResult<u16> {
        Ok(self.instance(db_name, namespace)?.port)
    }

    /// Numeric index of `db_name`.
    pub fn db_id(&self, db_name: &str, namespace: &str) -> DbConfigResult<u32> {
        Ok(self.database(db_name, namespace)?.id)
    }

    /// Key separator of `db_name`.
    pub fn separator(&self, db_name: &str, namespace: &str) -> DbConfigResult<String> {
        Ok(self.database(db_name, namespace)?.separator)
    }
}
