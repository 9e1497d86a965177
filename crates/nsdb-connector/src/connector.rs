//! Namespace-bound connection facade.
//!
//! A [`Connector`] is created for one namespace. On construction it
//! enumerates the namespace's logical databases; afterwards it resolves
//! each database's endpoint and index through the [`ConfigStore`] and
//! forwards everything else to its [`DbClient`].
//!
//! ```rust,ignore
//! use nsdb_connector::{Addressing, Connector, ConnectorOptions};
//!
//! let connector = Connector::with_shared_store(
//!     client,
//!     ConnectorOptions::default().addressing(Addressing::UnixSocket),
//! )?;
//! connector.connect("APPL_DB", true).await?;
//! let value = connector.get("APPL_DB", "PORT_TABLE:Ethernet0", "admin_status").await?;
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use nsdb_config::{ConfigStore, DEFAULT_NAMESPACE, InstanceSpec};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::client::{ClientOptions, ConnectTarget, DbClient, Endpoint};
use crate::error::{ConnectorError, ConnectorResult};

/// Which coordinates of an instance are used to reach it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Addressing {
    /// Connect through the instance's unix domain socket.
    UnixSocket,
    /// Connect through the instance's hostname and port.
    #[default]
    HostPort,
}

/// Construction options for a [`Connector`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectorOptions {
    #[serde(default)]
    pub addressing: Addressing,

    /// Namespace to resolve databases in; `None` is the namespace the process runs in.
    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub client: ClientOptions,
}

impl ConnectorOptions {
    pub fn addressing(mut self, addressing: Addressing) -> Self {
        self.addressing = addressing;
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn client(mut self, client: ClientOptions) -> Self {
        self.client = client;
        self
    }
}

/// Facade over a [`DbClient`] for the databases of one namespace.
pub struct Connector<C> {
    store: Arc<ConfigStore>,
    client: C,
    addressing: Addressing,
    namespace: Option<String>,
    client_options: ClientOptions,
    databases: BTreeSet<String>,
}

impl<C: DbClient> Connector<C> {
    /// Creates a facade resolving against `store`.
    ///
    /// Fails if the namespace cannot be resolved or if responses are not
    /// decoded.
    pub fn new(store: Arc<ConfigStore>, client: C, options: ConnectorOptions) -> ConnectorResult<Self> {
        if !options.client.decode_responses {
            return Err(ConnectorError::Unsupported(
                "decode_responses = false".to_string(),
            ));
        }

        let namespace_key = options.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE);
        let databases: BTreeSet<String> = store.database_names(namespace_key)?.into_iter().collect();

        debug!(
            namespace = namespace_key,
            addressing = ?options.addressing,
            databases = databases.len(),
            "Connector created"
        );

        Ok(Self {
            store,
            client,
            addressing: options.addressing,
            namespace: options.namespace,
            client_options: options.client,
            databases,
        })
    }

    /// Creates a facade resolving against the process-wide store.
    pub fn with_shared_store(client: C, options: ConnectorOptions) -> ConnectorResult<Self> {
        Self::new(ConfigStore::shared(), client, options)
    }

    /// The namespace this facade was created for, as given.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    /// The underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The logical databases known when this facade was created.
    pub fn database_names(&self) -> impl Iterator<Item = &str> {
        self.databases.iter().map(String::as_str)
    }

    /// Looks up the handle for a database name.
    pub fn handle(&self, db_name: &str) -> Option<&str> {
        self.databases.get(db_name).map(String::as_str)
    }

    pub fn db_instance(&self, db_name: &str) -> ConnectorResult<InstanceSpec> {
        Ok(self.store.instance(db_name, self.namespace_key())?)
    }

    pub fn db_socket(&self, db_name: &str) -> ConnectorResult<String> {
        Ok(self.store.socket_path(db_name, self.namespace_key())?)
    }

    pub fn db_hostname(&self, db_name: &str) -> ConnectorResult<String> {
        Ok(self.store.hostname(db_name, self.namespace_key())?)
    }

    pub fn db_port(&self, db_name: &str) -> ConnectorResult<u16> {
        Ok(self.store.port(db_name, self.namespace_key())?)
    }

    pub fn db_id(&self, db_name: &str) -> ConnectorResult<u32> {
        Ok(self.store.db_id(db_name, self.namespace_key())?)
    }

    pub fn db_separator(&self, db_name: &str) -> ConnectorResult<String> {
        Ok(self.store.separator(db_name, self.namespace_key())?)
    }

    /// The endpoint `db_name` is reached at under this facade's addressing mode.
    pub fn endpoint(&self, db_name: &str) -> ConnectorResult<Endpoint> {
        let endpoint = match self.addressing {
            Addressing::UnixSocket => Endpoint::UnixSocket(self.db_socket(db_name)?),
            Addressing::HostPort => Endpoint::Tcp {
                hostname: self.db_hostname(db_name)?,
                port: self.db_port(db_name)?,
            },
        };
        Ok(endpoint)
    }

    /// Resolves `db_name` and asks the client to connect to it.
    ///
    /// Nothing reaches the client when resolution fails. Config load failures
    /// are logged at `error`, unknown names at `debug`.
    pub async fn connect(&self, db_name: &str, retry_on: bool) -> ConnectorResult<()> {
        let (endpoint, db_id) = self
            .endpoint(db_name)
            .and_then(|endpoint| Ok((endpoint, self.db_id(db_name)?)))
            .inspect_err(|err| match err {
                ConnectorError::Config(err) if !err.is_lookup() => {
                    error!(namespace = self.namespace_key(), db_name, error = %err, "Database config could not be loaded")
                }
                _ => debug!(namespace = self.namespace_key(), db_name, error = %err, "Database could not be resolved"),
            })?;

        debug!(
            namespace = self.namespace_key(),
            db_name,
            db_id,
            endpoint = %endpoint,
            retry_on,
            "Connecting to database"
        );

        let target = ConnectTarget {
            db_id,
            db_name: db_name.to_string(),
            endpoint,
            options: self.client_options.clone(),
        };
        self.client.connect(target, retry_on).await?;
        Ok(())
    }

    pub async fn close(&self, db_name: &str) -> ConnectorResult<()> {
        Ok(self.client.close(db_name).await?)
    }

    pub async fn publish(&self, db_name: &str, channel: &str, message: &str) -> ConnectorResult<i64> {
        Ok(self.client.publish(db_name, channel, message).await?)
    }

    pub async fn expire(&self, db_name: &str, key: &str, timeout: Duration) -> ConnectorResult<bool> {
        Ok(self.client.expire(db_name, key, timeout).await?)
    }

    pub async fn exists(&self, db_name: &str, key: &str) -> ConnectorResult<bool> {
        Ok(self.client.exists(db_name, key).await?)
    }

    /// Keys matching `pattern`; use [`ALL_KEYS`](crate::client::ALL_KEYS) for every key.
    pub async fn keys(&self, db_name: &str, pattern: &str) -> ConnectorResult<Vec<String>> {
        Ok(self.client.keys(db_name, pattern).await?)
    }

    pub async fn get(&self, db_name: &str, hash: &str, key: &str) -> ConnectorResult<Option<String>> {
        Ok(self.client.get(db_name, hash, key).await?)
    }

    pub async fn get_all(&self, db_name: &str, hash: &str) -> ConnectorResult<HashMap<String, String>> {
        Ok(self.client.get_all(db_name, hash).await?)
    }

    pub async fn set(&self, db_name: &str, hash: &str, key: &str, value: &str) -> ConnectorResult<i64> {
        Ok(self.client.set(db_name, hash, key, value).await?)
    }

    pub async fn delete(&self, db_name: &str, key: &str) -> ConnectorResult<i64> {
        Ok(self.client.delete(db_name, key).await?)
    }

    pub async fn delete_all_by_pattern(&self, db_name: &str, pattern: &str) -> ConnectorResult<()> {
        Ok(self.client.delete_all_by_pattern(db_name, pattern).await?)
    }

    fn namespace_key(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ALL_KEYS;
    use crate::error::{ClientError, ClientResult};
    use async_trait::async_trait;
    use nsdb_config::{ConfigPaths, DbConfigError};
    use parking_lot::Mutex;
    use std::fs;
    use tempfile::TempDir;

    fn local_json(socket: &str, port: u16) -> String {
        format!(
            r#"{{
                "DATABASES": {{
                    "APPL_DB": {{"id": 0, "separator": ":", "instance": "redis"}},
                    "STATE_DB": {{"id": 6, "separator": "|", "instance": "redis"}}
                }},
                "INSTANCES": {{
                    "redis": {{"hostname": "127.0.0.1", "port": {port}, "unix_socket_path": "{socket}"}}
                }}
            }}"#
        )
    }

    fn store_in(dir: &TempDir) -> Arc<ConfigStore> {
        fs::write(
            dir.path().join("database_config.json"),
            local_json("/var/run/redis/redis.sock", 6379),
        )
        .unwrap();
        fs::create_dir(dir.path().join("asic0")).unwrap();
        fs::write(
            dir.path().join("asic0/database_config.json"),
            local_json("/var/run/redis0/redis.sock", 6380),
        )
        .unwrap();
        fs::write(
            dir.path().join("database_global.json"),
            r#"{"INCLUDES": [{"include": "database_config.json"}, {"namespace": "asic0", "include": "asic0/database_config.json"}]}"#,
        )
        .unwrap();

        Arc::new(ConfigStore::new(
            ConfigPaths::in_dir(dir.path()).with_fallback(dir.path().join("none.json")),
        ))
    }

    /// In-memory client that records connects and keeps hashes per database.
    #[derive(Default)]
    struct MemoryClient {
        connects: Mutex<Vec<(ConnectTarget, bool)>>,
        hashes: Mutex<HashMap<(String, String), HashMap<String, String>>>,
        closed: Mutex<Vec<String>>,
    }

    impl MemoryClient {
        fn ensure_connected(&self, db_name: &str) -> ClientResult<()> {
            let connected = self
                .connects
                .lock()
                .iter()
                .any(|(target, _)| target.db_name == db_name);
            if connected {
                Ok(())
            } else {
                Err(ClientError::NotConnected {
                    db_name: db_name.to_string(),
                })
            }
        }

        fn matching_keys(&self, db_name: &str, pattern: &str) -> Vec<String> {
            let prefix = pattern.trim_end_matches('*');
            let mut keys: Vec<String> = self
                .hashes
                .lock()
                .keys()
                .filter(|(db, key)| db == db_name && key.starts_with(prefix))
                .map(|(_, key)| key.clone())
                .collect();
            keys.sort();
            keys
        }
    }

    #[async_trait]
    impl DbClient for MemoryClient {
        async fn connect(&self, target: ConnectTarget, retry_on: bool) -> ClientResult<()> {
            self.connects.lock().push((target, retry_on));
            Ok(())
        }

        async fn close(&self, db_name: &str) -> ClientResult<()> {
            self.closed.lock().push(db_name.to_string());
            Ok(())
        }

        async fn publish(&self, db_name: &str, _channel: &str, _message: &str) -> ClientResult<i64> {
            self.ensure_connected(db_name)?;
            Ok(0)
        }

        async fn expire(&self, db_name: &str, key: &str, _timeout: Duration) -> ClientResult<bool> {
            self.exists(db_name, key).await
        }

        async fn exists(&self, db_name: &str, key: &str) -> ClientResult<bool> {
            self.ensure_connected(db_name)?;
            Ok(self
                .hashes
                .lock()
                .contains_key(&(db_name.to_string(), key.to_string())))
        }

        async fn keys(&self, db_name: &str, pattern: &str) -> ClientResult<Vec<String>> {
            self.ensure_connected(db_name)?;
            Ok(self.matching_keys(db_name, pattern))
        }

        async fn get(&self, db_name: &str, hash: &str, key: &str) -> ClientResult<Option<String>> {
            self.ensure_connected(db_name)?;
            Ok(self
                .hashes
                .lock()
                .get(&(db_name.to_string(), hash.to_string()))
                .and_then(|fields| fields.get(key).cloned()))
        }

        async fn get_all(&self, db_name: &str, hash: &str) -> ClientResult<HashMap<String, String>> {
            self.ensure_connected(db_name)?;
            Ok(self
                .hashes
                .lock()
                .get(&(db_name.to_string(), hash.to_string()))
                .cloned()
                .unwrap_or_default())
        }

        async fn set(&self, db_name: &str, hash: &str, key: &str, value: &str) -> ClientResult<i64> {
            self.ensure_connected(db_name)?;
            let mut hashes = self.hashes.lock();
            let fields = hashes
                .entry((db_name.to_string(), hash.to_string()))
                .or_default();
            let added = fields.insert(key.to_string(), value.to_string()).is_none();
            Ok(i64::from(added))
        }

        async fn delete(&self, db_name: &str, key: &str) -> ClientResult<i64> {
            self.ensure_connected(db_name)?;
            let removed = self
                .hashes
                .lock()
                .remove(&(db_name.to_string(), key.to_string()))
                .is_some();
            Ok(i64::from(removed))
        }

        async fn delete_all_by_pattern(&self, db_name: &str, pattern: &str) -> ClientResult<()> {
            for key in self.matching_keys(db_name, pattern) {
                self.delete(db_name, &key).await?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_enumerates_database_handles() {
        let dir = TempDir::new().unwrap();
        let connector =
            Connector::new(store_in(&dir), MemoryClient::default(), ConnectorOptions::default())
                .unwrap();

        let names: Vec<_> = connector.database_names().collect();
        assert_eq!(names, vec!["APPL_DB", "STATE_DB"]);
        assert_eq!(connector.handle("STATE_DB"), Some("STATE_DB"));
        assert_eq!(connector.handle("FOO_DB"), None);
        assert_eq!(connector.db_separator("STATE_DB").unwrap(), "|");
    }

    #[test]
    fn test_rejects_undecoded_responses() {
        let dir = TempDir::new().unwrap();
        let options = ConnectorOptions::default().client(ClientOptions {
            decode_responses: false,
            ..Default::default()
        });

        let result = Connector::new(store_in(&dir), MemoryClient::default(), options);
        assert!(matches!(result, Err(ConnectorError::Unsupported(_))));
    }

    #[test]
    fn test_namespace_needs_global_config() {
        let dir = TempDir::new().unwrap();
        let options = ConnectorOptions::default().namespace("asic0");

        let result = Connector::new(store_in(&dir), MemoryClient::default(), options);
        assert!(matches!(
            result,
            Err(ConnectorError::Config(DbConfigError::GlobalNotLoaded(_)))
        ));
    }

    #[tokio::test]
    async fn test_connect_over_unix_socket() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.load_global().unwrap();

        let options = ConnectorOptions::default()
            .addressing(Addressing::UnixSocket)
            .namespace("asic0");
        let connector = Connector::new(store, MemoryClient::default(), options).unwrap();

        connector.connect("STATE_DB", false).await.unwrap();

        let connects = connector.client().connects.lock();
        let (target, retry_on) = &connects[0];
        assert_eq!(target.db_id, 6);
        assert_eq!(target.db_name, "STATE_DB");
        assert_eq!(
            target.endpoint,
            Endpoint::UnixSocket("/var/run/redis0/redis.sock".to_string())
        );
        assert!(!*retry_on);
    }

    #[tokio::test]
    async fn test_connect_over_host_port() {
        let dir = TempDir::new().unwrap();
        let connector =
            Connector::new(store_in(&dir), MemoryClient::default(), ConnectorOptions::default())
                .unwrap();

        connector.connect("APPL_DB", true).await.unwrap();

        let connects = connector.client().connects.lock();
        let (target, retry_on) = &connects[0];
        assert_eq!(target.db_id, 0);
        assert_eq!(
            target.endpoint,
            Endpoint::Tcp {
                hostname: "127.0.0.1".to_string(),
                port: 6379
            }
        );
        assert!(target.options.decode_responses);
        assert!(*retry_on);
    }

    #[tokio::test]
    async fn test_connect_unknown_database_fails_before_client() {
        let dir = TempDir::new().unwrap();
        let connector =
            Connector::new(store_in(&dir), MemoryClient::default(), ConnectorOptions::default())
                .unwrap();

        let result = connector.connect("NO_SUCH_DB", true).await;
        match result {
            Err(ConnectorError::Config(err)) => {
                assert!(matches!(err, DbConfigError::UnknownDatabase { .. }));
                assert!(err.is_lookup());
            }
            other => panic!("expected config error, got {other:?}"),
        }
        assert!(connector.client().connects.lock().is_empty());
    }

    #[tokio::test]
    async fn test_connect_reports_config_load_failure() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let connector =
            Connector::new(store.clone(), MemoryClient::default(), ConnectorOptions::default())
                .unwrap();

        store.reset();
        fs::remove_file(dir.path().join("database_config.json")).unwrap();

        let result = connector.connect("APPL_DB", false).await;
        match result {
            Err(ConnectorError::Config(err)) => {
                assert!(matches!(err, DbConfigError::ConfigLoad { .. }));
                assert!(!err.is_lookup());
            }
            other => panic!("expected config error, got {other:?}"),
        }
        assert!(connector.client().connects.lock().is_empty());
    }

    #[tokio::test]
    async fn test_data_operations_are_forwarded() {
        let dir = TempDir::new().unwrap();
        let connector =
            Connector::new(store_in(&dir), MemoryClient::default(), ConnectorOptions::default())
                .unwrap();

        let result = connector.get("APPL_DB", "PORT_TABLE:Ethernet0", "mtu").await;
        assert!(matches!(
            result,
            Err(ConnectorError::Client(ClientError::NotConnected { .. }))
        ));

        connector.connect("APPL_DB", true).await.unwrap();
        assert_eq!(
            connector
                .set("APPL_DB", "PORT_TABLE:Ethernet0", "mtu", "9100")
                .await
                .unwrap(),
            1
        );
        connector
            .set("APPL_DB", "PORT_TABLE:Ethernet4", "mtu", "1500")
            .await
            .unwrap();

        assert_eq!(
            connector
                .get("APPL_DB", "PORT_TABLE:Ethernet0", "mtu")
                .await
                .unwrap()
                .as_deref(),
            Some("9100")
        );
        assert_eq!(
            connector
                .get_all("APPL_DB", "PORT_TABLE:Ethernet4")
                .await
                .unwrap()["mtu"],
            "1500"
        );
        assert!(connector.exists("APPL_DB", "PORT_TABLE:Ethernet0").await.unwrap());
        assert!(
            connector
                .expire("APPL_DB", "PORT_TABLE:Ethernet0", Duration::from_secs(60))
                .await
                .unwrap()
        );
        assert_eq!(
            connector.keys("APPL_DB", ALL_KEYS).await.unwrap(),
            vec!["PORT_TABLE:Ethernet0", "PORT_TABLE:Ethernet4"]
        );
        assert_eq!(connector.publish("APPL_DB", "PORT_TABLE", "set").await.unwrap(), 0);

        assert_eq!(
            connector.delete("APPL_DB", "PORT_TABLE:Ethernet0").await.unwrap(),
            1
        );
        connector
            .delete_all_by_pattern("APPL_DB", "PORT_TABLE:*")
            .await
            .unwrap();
        assert!(connector.keys("APPL_DB", ALL_KEYS).await.unwrap().is_empty());

        connector.close("APPL_DB").await.unwrap();
        assert_eq!(*connector.client().closed.lock(), vec!["APPL_DB"]);
    }
}
