//! Schema integrity checks applied before a namespace schema is stored.

use super::error::{DbConfigError, DbConfigResult};
use super::schema::NamespaceSchema;

/// Validates a namespace schema.
///
/// Every database must reference an instance declared in `INSTANCES`.
pub fn validate_schema(namespace: &str, schema: &NamespaceSchema) -> DbConfigResult<()> {
    for (name, db) in &schema.databases {
        if !schema.instances.contains_key(&db.instance) {
            return Err(DbConfigError::validation(
                namespace,
                format!(
                    "database '{}' references unknown instance '{}'",
                    name, db.instance
                ),
            ));
        }
    }

    Ok(())
}
