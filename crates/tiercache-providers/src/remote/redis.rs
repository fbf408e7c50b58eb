//! Redis remote store
//!
//! Blocking Redis client for the preferred cache tier. Connections are
//! established lazily, bounded by a connect timeout, and every command is
//! bounded by read/write timeouts so a degraded server cannot stall the
//! caching path. A failed command drops the connection; the next call
//! reconnects.
//!
//! ## Example
//!
//! ```ignore
//! use tiercache_providers::remote::{RedisConnectionConfig, RedisRemoteStore};
//!
//! let store = RedisRemoteStore::new(RedisConnectionConfig {
//!     host: "localhost".to_string(),
//!     db: 2,
//!     ..RedisConnectionConfig::default()
//! })?;
//! store.ping()?;
//! ```

use crate::constants::{
    REDIS_CONNECT_TIMEOUT_MS, REDIS_DEFAULT_HOST, REDIS_DEFAULT_PORT, REDIS_OPERATION_TIMEOUT_MS,
    REDIS_SCAN_COUNT,
};
use redis::{Client, Connection, RedisResult};
use std::sync::Mutex;
use std::time::Duration;
use tiercache_domain::error::{Error, Result};
use tiercache_domain::ports::RemoteStore;

/// Connection settings for one Redis database
#[derive(Clone, PartialEq, Eq)]
pub struct RedisConnectionConfig {
    /// Server hostname
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database index
    pub db: u32,
    /// Optional password
    pub password: Option<String>,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Per-command read/write timeout
    pub operation_timeout: Duration,
}

impl Default for RedisConnectionConfig {
    fn default() -> Self {
        Self {
            host: REDIS_DEFAULT_HOST.to_string(),
            port: REDIS_DEFAULT_PORT,
            db: 0,
            password: None,
            connect_timeout: Duration::from_millis(REDIS_CONNECT_TIMEOUT_MS),
            operation_timeout: Duration::from_millis(REDIS_OPERATION_TIMEOUT_MS),
        }
    }
}

impl RedisConnectionConfig {
    /// Connection URL (`redis://[:password@]host:port/db`)
    pub fn url(&self) -> String {
        match self.password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                urlencoding::encode(password),
                self.host,
                self.port,
                self.db
            ),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }

    /// Server address without credentials
    pub fn address(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.db)
    }
}

impl std::fmt::Debug for RedisConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConnectionConfig")
            .field("address", &self.address())
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("connect_timeout", &self.connect_timeout)
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

/// Redis remote store
///
/// Commands on one store are serialized over a single connection.
pub struct RedisRemoteStore {
    client: Client,
    config: RedisConnectionConfig,
    connection: Mutex<Option<Connection>>,
}

impl RedisRemoteStore {
    /// Create a store; no connection is made until the first command
    pub fn new(config: RedisConnectionConfig) -> Result<Self> {
        let client = Client::open(config.url()).map_err(|e| {
            Error::remote_with_source(format!("Failed to create Redis client: {e}"), e)
        })?;

        Ok(Self {
            client,
            config,
            connection: Mutex::new(None),
        })
    }

    /// Server address description
    pub fn server_address(&self) -> String {
        self.config.address()
    }

    fn connect(&self) -> Result<Connection> {
        let connection = self
            .client
            .get_connection_with_timeout(self.config.connect_timeout)
            .map_err(|e| {
                Error::remote_with_source(format!("Failed to connect to Redis: {e}"), e)
            })?;

        let timeout = Some(self.config.operation_timeout);
        connection
            .set_read_timeout(timeout)
            .and_then(|()| connection.set_write_timeout(timeout))
            .map_err(|e| {
                Error::remote_with_source(format!("Failed to configure Redis timeouts: {e}"), e)
            })?;

        Ok(connection)
    }

    fn with_connection<T, F>(&self, command: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> RedisResult<T>,
    {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| Error::remote("Redis connection lock poisoned"))?;

        if guard.is_none() {
            *guard = Some(self.connect()?);
        }
        let connection = guard
            .as_mut()
            .ok_or_else(|| Error::remote("Redis connection missing"))?;

        f(connection).map_err(|e| {
            *guard = None;
            Error::remote_with_source(format!("Redis {command} failed: {e}"), e)
        })
    }
}

impl RemoteStore for RedisRemoteStore {
    fn ping(&self) -> Result<()> {
        self.with_connection("PING", |conn| {
            redis::cmd("PING").query::<String>(conn).map(|_| ())
        })
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.with_connection("GET", |conn| redis::cmd("GET").arg(key).query(conn))
    }

    fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        self.with_connection("SET", |conn| {
            redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("PX")
                .arg(millis)
                .query(conn)
        })
    }

    fn delete(&self, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        self.with_connection("DEL", |conn| redis::cmd("DEL").arg(keys).query(conn))
    }

    fn scan(&self, pattern: &str) -> Result<Vec<String>> {
        self.with_connection("SCAN", |conn| {
            let mut keys = Vec::new();
            let mut cursor: u64 = 0;
            loop {
                let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(pattern)
                    .arg("COUNT")
                    .arg(REDIS_SCAN_COUNT)
                    .query(conn)?;
                keys.extend(batch);
                if next == 0 {
                    return Ok(keys);
                }
                cursor = next;
            }
        })
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisRemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRemoteStore")
            .field("server", &self.server_address())
            .finish()
    }
}
