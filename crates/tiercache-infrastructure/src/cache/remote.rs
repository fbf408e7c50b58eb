//! Remote tier construction from configuration

use crate::config::{RemoteConfig, RemoteProvider};
use std::sync::Arc;
use tiercache_domain::error::Result;
use tiercache_domain::ports::{RemoteStore, RemoteStoreFactory};
use tiercache_providers::remote::{MemoryRemoteStore, RedisConnectionConfig, RedisRemoteStore};
use tracing::debug;

/// Builds each namespace's remote store from [`RemoteConfig`]
///
/// Redis namespaces get their own connection on the database index chosen by
/// [`RemoteConfig::db_for`]. The memory provider hands every namespace the
/// same in-process store; keys are namespaced, so they never collide.
#[derive(Debug, Clone)]
pub struct ConfiguredRemoteFactory {
    config: RemoteConfig,
    memory: MemoryRemoteStore,
}

impl ConfiguredRemoteFactory {
    /// Create a factory for `config`
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            memory: MemoryRemoteStore::new(),
        }
    }

    /// Connection settings for `cache_name`
    pub fn redis_config(&self, cache_name: &str) -> RedisConnectionConfig {
        RedisConnectionConfig {
            host: self.config.host.clone(),
            port: self.config.port,
            db: self.config.db_for(cache_name),
            password: self.config.password.clone(),
            connect_timeout: self.config.connect_timeout(),
            operation_timeout: self.config.operation_timeout(),
        }
    }
}

impl RemoteStoreFactory for ConfiguredRemoteFactory {
    fn create(&self, cache_name: &str) -> Result<Option<Arc<dyn RemoteStore>>> {
        if !self.config.enabled {
            return Ok(None);
        }

        let store: Arc<dyn RemoteStore> = match self.config.provider {
            RemoteProvider::Redis => {
                let redis_config = self.redis_config(cache_name);
                debug!(cache_name, server = %redis_config.address(), "Creating Redis remote store");
                Arc::new(RedisRemoteStore::new(redis_config)?)
            }
            RemoteProvider::Memory => Arc::new(self.memory.clone()),
        };
        Ok(Some(store))
    }
}
