//! In-process remote store
//!
//! Moka-backed implementation of the remote tier for single-host
//! deployments and tests. Every entry carries its own TTL.
//!
//! ## Example
//!
//! ```
//! use tiercache_providers::remote::MemoryRemoteStore;
//! use tiercache_providers::RemoteStore;
//! use std::time::Duration;
//!
//! let store = MemoryRemoteStore::new();
//! store.set_with_expiry("ns:cache:abc", b"1", Duration::from_secs(60)).unwrap();
//! assert_eq!(store.get("ns:cache:abc").unwrap(), Some(b"1".to_vec()));
//! ```

use crate::constants::MEMORY_STORE_DEFAULT_CAPACITY;
use crate::utils::KeyPattern;
use moka::Expiry;
use moka::sync::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tiercache_domain::error::Result;
use tiercache_domain::ports::RemoteStore;

#[derive(Clone)]
struct StoredValue {
    bytes: Arc<Vec<u8>>,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Moka-based remote store
///
/// Clones share the same underlying cache.
#[derive(Clone)]
pub struct MemoryRemoteStore {
    cache: Cache<String, StoredValue>,
    max_entries: u64,
}

impl Default for MemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemoteStore {
    /// Create a store with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(MEMORY_STORE_DEFAULT_CAPACITY)
    }

    /// Create a store holding at most `max_entries` entries
    pub fn with_capacity(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache, max_entries }
    }

    /// Maximum number of entries
    pub fn max_entries(&self) -> u64 {
        self.max_entries
    }

    /// Number of live entries
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.cache.get(key).map(|stored| stored.bytes.as_ref().clone()))
    }

    fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        self.cache.insert(
            key.to_string(),
            StoredValue {
                bytes: Arc::new(value.to_vec()),
                ttl,
            },
        );
        Ok(())
    }

    fn delete(&self, keys: &[String]) -> Result<u64> {
        Ok(keys
            .iter()
            .filter(|key| self.cache.remove(key.as_str()).is_some())
            .count() as u64)
    }

    fn scan(&self, pattern: &str) -> Result<Vec<String>> {
        let pattern = KeyPattern::new(pattern)?;
        Ok(self
            .cache
            .iter()
            .map(|(key, _)| key.as_ref().clone())
            .filter(|key| pattern.matches(key))
            .collect())
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}

impl std::fmt::Debug for MemoryRemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRemoteStore")
            .field("max_entries", &self.max_entries)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}
