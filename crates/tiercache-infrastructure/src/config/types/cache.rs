//! Cache configuration types

use crate::constants::{
    DISK_CACHE_DIR_NAME, REMOTE_CONNECT_TIMEOUT_MS, REMOTE_DEFAULT_HOST, REMOTE_DEFAULT_PORT,
    REMOTE_OPERATION_TIMEOUT_MS, REMOTE_REPROBE_INTERVAL_SECS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tiercache_domain::constants::DEFAULT_TTL_SECS;

/// Remote tier providers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RemoteProvider {
    /// Network cache service (Redis)
    #[default]
    Redis,
    /// In-process store (Moka), shared by every namespace
    Memory,
}

/// Disk tier configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskConfig {
    /// Disk tier enabled
    pub enabled: bool,

    /// Base directory; one subdirectory per namespace
    pub base_dir: Option<PathBuf>,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_dir: None,
        }
    }
}

impl DiskConfig {
    /// Effective base directory: the override, else `<temp dir>/tiercache`
    pub fn resolved_base_dir(&self) -> PathBuf {
        self.base_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DISK_CACHE_DIR_NAME))
    }
}

/// Remote tier configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Remote tier enabled
    pub enabled: bool,

    /// Remote provider
    pub provider: RemoteProvider,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Default database index
    pub db: u32,

    /// Server password
    pub password: Option<String>,

    /// Per-namespace database index overrides
    pub db_overrides: BTreeMap<String, u32>,

    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,

    /// Per-command timeout in milliseconds
    pub operation_timeout_ms: u64,

    /// Seconds before a degraded remote tier is probed again
    pub reprobe_interval_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: RemoteProvider::default(),
            host: REMOTE_DEFAULT_HOST.to_string(),
            port: REMOTE_DEFAULT_PORT,
            db: 0,
            password: None,
            db_overrides: BTreeMap::new(),
            connect_timeout_ms: REMOTE_CONNECT_TIMEOUT_MS,
            operation_timeout_ms: REMOTE_OPERATION_TIMEOUT_MS,
            reprobe_interval_secs: REMOTE_REPROBE_INTERVAL_SECS,
        }
    }
}

impl RemoteConfig {
    /// Database index used by `cache_name`
    ///
    /// Override names are matched case-insensitively.
    pub fn db_for(&self, cache_name: &str) -> u32 {
        self.db_overrides
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(cache_name))
            .map_or(self.db, |(_, db)| *db)
    }

    /// Connect timeout
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Per-command timeout
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Interval between probes of a degraded remote tier
    pub fn reprobe_interval(&self) -> Duration {
        Duration::from_secs(self.reprobe_interval_secs)
    }
}

/// Cache system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSystemConfig {
    /// TTL used by memoizers that do not set one, in seconds
    pub default_ttl_secs: u64,

    /// Disk tier
    pub disk: DiskConfig,

    /// Remote tier
    pub remote: RemoteConfig,
}

impl Default for CacheSystemConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: DEFAULT_TTL_SECS,
            disk: DiskConfig::default(),
            remote: RemoteConfig::default(),
        }
    }
}

impl CacheSystemConfig {
    /// Configuration for a disk-only cache rooted at `base_dir`
    pub fn disk_only<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            disk: DiskConfig {
                enabled: true,
                base_dir: Some(base_dir.into()),
            },
            remote: RemoteConfig {
                enabled: false,
                ..RemoteConfig::default()
            },
            ..Self::default()
        }
    }

    /// Default TTL
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }
}
