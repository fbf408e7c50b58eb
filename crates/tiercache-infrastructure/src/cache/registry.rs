//! Per-namespace engine registry
//!
//! Holds at most one [`HybridCacheEngine`] per cache name. Applications
//! normally own one registry at their composition root and pass it around;
//! [`CacheRegistry::global`] exists for call sites that cannot be threaded
//! through.

use super::engine::{EngineOptions, HybridCacheEngine};
use super::remote::ConfiguredRemoteFactory;
use crate::config::{CacheSystemConfig, ConfigLoader};
use once_cell::sync::{Lazy, OnceCell};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tiercache_domain::constants::DEFAULT_CACHE_NAME;
use tiercache_domain::ports::{RemoteStoreFactory, ValueCodec};
use tiercache_providers::codec::JsonCodec;
use tiercache_providers::disk::DiskStore;
use tracing::{info, warn};

static GLOBAL_REGISTRY: Lazy<CacheRegistry> = Lazy::new(|| {
    let config = ConfigLoader::new().load().map_or_else(
        |e| {
            warn!(error = %e, "Invalid cache configuration, using defaults");
            CacheSystemConfig::default()
        },
        |app| app.cache,
    );
    CacheRegistry::new(config)
});

// Filled once per name; built outside the map lock
type EngineSlot = Arc<OnceCell<Arc<HybridCacheEngine>>>;

/// Registry of hybrid cache engines keyed by cache name
pub struct CacheRegistry {
    config: CacheSystemConfig,
    remote_factory: Arc<dyn RemoteStoreFactory>,
    codec: Arc<dyn ValueCodec>,
    engines: RwLock<HashMap<String, EngineSlot>>,
}

impl CacheRegistry {
    /// Create a registry whose remote tier follows `config.remote`
    pub fn new(config: CacheSystemConfig) -> Self {
        let factory = ConfiguredRemoteFactory::new(config.remote.clone());
        Self::with_remote_factory(config, Arc::new(factory))
    }

    /// Create a registry with an explicit remote store factory
    pub fn with_remote_factory(
        config: CacheSystemConfig,
        remote_factory: Arc<dyn RemoteStoreFactory>,
    ) -> Self {
        Self {
            config,
            remote_factory,
            codec: Arc::new(JsonCodec::new()),
            engines: RwLock::new(HashMap::new()),
        }
    }

    /// Replace the value codec used by engines created from now on
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn ValueCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Process-wide registry configured through [`ConfigLoader`]
    pub fn global() -> &'static CacheRegistry {
        &GLOBAL_REGISTRY
    }

    /// Configuration engines are built from
    pub fn config(&self) -> &CacheSystemConfig {
        &self.config
    }

    /// TTL memoizers fall back to
    pub fn default_ttl(&self) -> Duration {
        self.config.default_ttl()
    }

    /// Engine for `cache_name`, created on first use
    ///
    /// Concurrent first calls for the same name construct exactly one engine.
    /// Construction (including the first remote ping) runs without holding the
    /// map lock, so other namespaces stay reachable meanwhile.
    pub fn get_or_create(&self, cache_name: &str) -> Arc<HybridCacheEngine> {
        let slot = self.slot(cache_name);
        Arc::clone(slot.get_or_init(|| Arc::new(self.build_engine(cache_name))))
    }

    /// Engine for the `default` namespace
    pub fn default_engine(&self) -> Arc<HybridCacheEngine> {
        self.get_or_create(DEFAULT_CACHE_NAME)
    }

    /// Names of the namespaces created so far, sorted
    pub fn names(&self) -> Vec<String> {
        let engines = match self.engines.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut names: Vec<String> = engines
            .iter()
            .filter(|(_, slot)| slot.get().is_some())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Number of namespaces created so far
    pub fn len(&self) -> usize {
        let engines = match self.engines.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        engines.values().filter(|slot| slot.get().is_some()).count()
    }

    /// Whether no namespace has been created yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, cache_name: &str) -> EngineSlot {
        {
            let engines = match self.engines.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(slot) = engines.get(cache_name) {
                return Arc::clone(slot);
            }
        }

        let mut engines = match self.engines.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(engines.entry(cache_name.to_string()).or_default())
    }

    fn build_engine(&self, cache_name: &str) -> HybridCacheEngine {
        let disk = if self.config.disk.enabled {
            DiskStore::open(self.config.disk.resolved_base_dir(), cache_name)
        } else {
            DiskStore::unavailable()
        };

        let remote = self.remote_factory.create(cache_name).unwrap_or_else(|e| {
            warn!(cache_name, error = %e, "Remote cache setup failed, using disk only");
            None
        });

        let engine = HybridCacheEngine::new(
            cache_name,
            disk,
            remote,
            EngineOptions {
                codec: Arc::clone(&self.codec),
                reprobe_interval: self.config.remote.reprobe_interval(),
            },
        );
        info!(
            cache_name,
            remote = %engine.remote_health(),
            disk = engine.stats().disk_available,
            "Cache namespace initialized"
        );
        engine
    }
}

impl fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("names", &self.names())
            .field("codec", &self.codec.name())
            .finish_non_exhaustive()
    }
}
