//! Shared fixtures

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tiercache_domain::error::{Error, Result};
use tiercache_domain::ports::{NoRemoteStore, RemoteStore, RemoteStoreFactory};
use tiercache_infrastructure::cache::{CacheRegistry, EngineOptions, HybridCacheEngine};
use tiercache_infrastructure::config::CacheSystemConfig;
use tiercache_providers::disk::DiskStore;

/// Remote store that fails every call
#[derive(Debug, Default)]
pub struct BrokenRemote {
    pub calls: AtomicU64,
}

impl BrokenRemote {
    fn fail<T>(&self) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::remote("timed out"))
    }
}

impl RemoteStore for BrokenRemote {
    fn ping(&self) -> Result<()> {
        self.fail()
    }
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        self.fail()
    }
    fn set_with_expiry(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<()> {
        self.fail()
    }
    fn delete(&self, _keys: &[String]) -> Result<u64> {
        self.fail()
    }
    fn scan(&self, _pattern: &str) -> Result<Vec<String>> {
        self.fail()
    }
    fn provider_name(&self) -> &str {
        "broken"
    }
}

/// Factory handing out one fixed remote store
pub struct FixedRemote(pub Arc<dyn RemoteStore>);

impl RemoteStoreFactory for FixedRemote {
    fn create(&self, _cache_name: &str) -> Result<Option<Arc<dyn RemoteStore>>> {
        Ok(Some(Arc::clone(&self.0)))
    }
}

/// Disk-only registry in a fresh temporary directory
pub fn disk_registry() -> (TempDir, CacheRegistry) {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry = CacheRegistry::with_remote_factory(
        CacheSystemConfig::disk_only(dir.path()),
        Arc::new(NoRemoteStore),
    );
    (dir, registry)
}

/// Registry whose namespaces all use `remote`
pub fn registry_with_remote(remote: Arc<dyn RemoteStore>) -> (TempDir, CacheRegistry) {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry = CacheRegistry::with_remote_factory(
        CacheSystemConfig::disk_only(dir.path()),
        Arc::new(FixedRemote(remote)),
    );
    (dir, registry)
}

/// Engine over `remote` with a re-probe interval long enough to never fire
pub fn engine_with_remote(
    dir: &std::path::Path,
    name: &str,
    remote: Arc<dyn RemoteStore>,
) -> HybridCacheEngine {
    HybridCacheEngine::new(
        name,
        DiskStore::open(dir, name),
        Some(remote),
        EngineOptions {
            reprobe_interval: Duration::from_secs(3600),
            ..EngineOptions::default()
        },
    )
}
