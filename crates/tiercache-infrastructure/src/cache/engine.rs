//! Hybrid cache engine
//!
//! One engine serves one namespace. Reads try the remote tier first and fall
//! back to disk; writes go to the remote tier alone while it is healthy and
//! to disk only when it is not. Nothing here returns an error to the caller:
//! tier failures are logged and reported as a miss or a `false` result.

use crate::constants::REMOTE_REPROBE_INTERVAL_SECS;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tiercache_domain::constants::MAX_TTL_SECS;
use tiercache_domain::error::{Error, Result};
use tiercache_domain::ports::{RemoteStore, ValueCodec};
use tiercache_domain::value_objects::{
    CacheKey, CacheRecord, EngineStats, RemoteHealth, TierCounters, remote_pattern,
};
use tiercache_providers::codec::JsonCodec;
use tiercache_providers::disk::DiskStore;
use tracing::{debug, warn};

/// Tunables applied when an engine is built
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Codec for stored values
    pub codec: Arc<dyn ValueCodec>,
    /// Minimum time between probes of a degraded remote tier
    pub reprobe_interval: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            codec: Arc::new(JsonCodec::new()),
            reprobe_interval: Duration::from_secs(REMOTE_REPROBE_INTERVAL_SECS),
        }
    }
}

#[derive(Debug)]
struct RemoteTier {
    store: Arc<dyn RemoteStore>,
    state: Mutex<ProbeState>,
}

impl RemoteTier {
    // Plain data: a panic mid-update leaves it usable
    fn probe_state(&self) -> MutexGuard<'_, ProbeState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ProbeState {
    health: RemoteHealth,
    last_probe: Option<Instant>,
}

#[derive(Debug, Default)]
struct Counters {
    remote_hits: AtomicU64,
    disk_hits: AtomicU64,
    misses: AtomicU64,
    remote_writes: AtomicU64,
    disk_writes: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> TierCounters {
        TierCounters {
            remote_hits: self.remote_hits.load(Ordering::Relaxed),
            disk_hits: self.disk_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            remote_writes: self.remote_writes.load(Ordering::Relaxed),
            disk_writes: self.disk_writes.load(Ordering::Relaxed),
        }
    }
}

/// Two-tier cache for one namespace
///
/// # Example
///
/// ```
/// use tiercache_infrastructure::cache::{EngineOptions, HybridCacheEngine};
/// use tiercache_providers::disk::DiskStore;
/// use serde_json::json;
/// use std::time::Duration;
///
/// let dir = tempfile::tempdir().unwrap();
/// let engine = HybridCacheEngine::new(
///     "settings",
///     DiskStore::open(dir.path(), "settings"),
///     None,
///     EngineOptions::default(),
/// );
///
/// let ttl = Duration::from_secs(5);
/// assert!(engine.set("tenant:42", &json!({"plan": "pro"}), ttl));
/// assert_eq!(engine.get("tenant:42", ttl), Some(json!({"plan": "pro"})));
/// ```
pub struct HybridCacheEngine {
    cache_name: String,
    disk: DiskStore,
    remote: Option<RemoteTier>,
    codec: Arc<dyn ValueCodec>,
    reprobe_interval: Duration,
    counters: Counters,
}

impl HybridCacheEngine {
    /// Build an engine and probe the remote tier once
    ///
    /// A failed probe leaves the engine running on disk; it never fails
    /// construction.
    pub fn new(
        cache_name: &str,
        disk: DiskStore,
        remote: Option<Arc<dyn RemoteStore>>,
        options: EngineOptions,
    ) -> Self {
        let engine = Self {
            cache_name: cache_name.to_string(),
            disk,
            remote: remote.map(|store| RemoteTier {
                store,
                state: Mutex::new(ProbeState {
                    health: RemoteHealth::Unknown,
                    last_probe: None,
                }),
            }),
            codec: options.codec,
            reprobe_interval: options.reprobe_interval,
            counters: Counters::default(),
        };

        if engine.remote_store().is_none() && engine.remote.is_some() {
            debug!(cache_name, "Remote cache unavailable at startup, using disk");
        }
        engine
    }

    /// Namespace served by this engine
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Current remote tier state, without probing
    pub fn remote_health(&self) -> RemoteHealth {
        match &self.remote {
            None => RemoteHealth::Disabled,
            Some(tier) => tier.probe_state().health,
        }
    }

    /// Derive the storage key for arbitrary key data in this namespace
    pub fn generate_key<T: Serialize + ?Sized>(&self, prefix: &str, key_data: &T) -> Result<CacheKey> {
        CacheKey::generate(&self.cache_name, prefix, key_data)
    }

    /// Storage key for a logical string key
    pub fn key_for(&self, key: &str) -> CacheKey {
        CacheKey::for_logical_key(&self.cache_name, key)
    }

    /// Look up a logical key
    ///
    /// `ttl` is the oldest record the caller accepts; records past their own
    /// expiry are absent regardless.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<Value> {
        self.get_by_key(&self.key_for(key), ttl)
    }

    /// Look up a logical key and deserialize the value
    pub fn get_as<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        let value = self.get(key, ttl)?;
        serde_json::from_value(value)
            .map_err(|e| debug!(cache_name = %self.cache_name, key, error = %e, "Cached value has unexpected shape"))
            .ok()
    }

    /// Store a value under a logical key
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) -> bool {
        self.set_by_key(&self.key_for(key), value, ttl)
    }

    /// Remove a logical key from both tiers
    pub fn delete(&self, key: &str) -> bool {
        self.delete_by_key(&self.key_for(key))
    }

    /// Look up a precomputed key
    pub fn get_by_key(&self, key: &CacheKey, ttl: Duration) -> Option<Value> {
        let storage_key = key.to_string();

        if let Some(remote) = self.remote_store() {
            match remote.get(&storage_key) {
                Ok(Some(bytes)) => match self.codec.decode(&bytes) {
                    Ok(value) => {
                        Counters::bump(&self.counters.remote_hits);
                        return Some(value);
                    }
                    Err(e) => {
                        debug!(cache_name = %self.cache_name, key = %storage_key, error = %e, "Undecodable remote value");
                    }
                },
                Ok(None) => {}
                Err(e) => self.remote_failed("get", &e),
            }
        }

        match self.read_disk(key, ttl) {
            Some(value) => {
                Counters::bump(&self.counters.disk_hits);
                Some(value)
            }
            None => {
                Counters::bump(&self.counters.misses);
                None
            }
        }
    }

    /// Store a value under a precomputed key
    ///
    /// # Returns
    /// True if either tier accepted the write. A zero `ttl` stores nothing;
    /// anything above [`MAX_TTL_SECS`] is shortened to it on both tiers.
    pub fn set_by_key<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T, ttl: Duration) -> bool {
        if ttl.is_zero() {
            warn!(cache_name = %self.cache_name, key = %key, "Refusing to cache with a zero TTL");
            return false;
        }
        let ttl = ttl.min(Duration::from_secs(MAX_TTL_SECS));

        let bytes = match serde_json::to_value(value)
            .map_err(Error::from)
            .and_then(|value| self.codec.encode(&value))
        {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(cache_name = %self.cache_name, key = %key, error = %e, "Value cannot be serialized");
                return false;
            }
        };

        if let Some(remote) = self.remote_store() {
            match remote.set_with_expiry(&key.to_string(), &bytes, ttl) {
                Ok(()) => {
                    Counters::bump(&self.counters.remote_writes);
                    return true;
                }
                Err(e) => self.remote_failed("set", &e),
            }
        }

        self.write_disk(key, bytes, ttl)
    }

    /// Remove a precomputed key from both tiers
    ///
    /// # Returns
    /// True if either tier held the key
    pub fn delete_by_key(&self, key: &CacheKey) -> bool {
        let mut removed = false;

        if let Some(remote) = self.remote_store() {
            match remote.delete(&[key.to_string()]) {
                Ok(count) => removed |= count > 0,
                Err(e) => self.remote_failed("delete", &e),
            }
        }

        match self.disk.remove(key) {
            Ok(found) => removed |= found,
            Err(e) => warn!(cache_name = %self.cache_name, key = %key, error = %e, "Disk delete failed"),
        }

        removed
    }

    /// Remove disk records that expired at or before `now`
    ///
    /// The remote tier expires entries on its own.
    pub fn clear_expired(&self, now: DateTime<Utc>) -> usize {
        self.disk.purge_expired(now).unwrap_or_else(|e| {
            warn!(cache_name = %self.cache_name, error = %e, "Expired record purge failed");
            0
        })
    }

    /// Remove every key of this namespace matching a glob `pattern`
    ///
    /// The pattern applies to the part after the namespace, so
    /// `clear("tenant:*")` removes logical keys `tenant:<anything>`.
    ///
    /// # Returns
    /// Keys removed from both tiers combined
    pub fn clear(&self, pattern: &str) -> usize {
        let mut removed = 0;

        if let Some(remote) = self.remote_store() {
            let deleted = remote
                .scan(&remote_pattern(&self.cache_name, pattern))
                .and_then(|keys| remote.delete(&keys));
            match deleted {
                Ok(count) => removed += usize::try_from(count).unwrap_or(usize::MAX),
                Err(e) => self.remote_failed("clear", &e),
            }
        }

        match self.disk.remove_matching(&self.cache_name, pattern) {
            Ok(count) => removed += count,
            Err(e) => warn!(cache_name = %self.cache_name, pattern, error = %e, "Disk clear failed"),
        }

        debug!(cache_name = %self.cache_name, pattern, removed, "Cache cleared");
        removed
    }

    /// Remove every key of this namespace
    pub fn clear_all(&self) -> usize {
        self.clear("*")
    }

    /// Point-in-time view of the namespace
    pub fn stats(&self) -> EngineStats {
        let remote_health = self.remote_health();
        EngineStats {
            cache_name: self.cache_name.clone(),
            remote_available: remote_health.is_available(),
            remote_health,
            disk_available: self.disk.is_available(),
            disk_path: self.disk.directory().map(std::path::Path::to_path_buf),
            counters: self.counters.snapshot(),
        }
    }

    /// Remote store to use for the next operation, probing if one is due
    fn remote_store(&self) -> Option<&Arc<dyn RemoteStore>> {
        let tier = self.remote.as_ref()?;
        let mut state = tier.probe_state();

        match state.health {
            RemoteHealth::Available => return Some(&tier.store),
            RemoteHealth::Disabled => return None,
            RemoteHealth::Unknown | RemoteHealth::Degraded => {}
        }

        if state
            .last_probe
            .is_some_and(|at| at.elapsed() < self.reprobe_interval)
        {
            return None;
        }

        state.last_probe = Some(Instant::now());
        match tier.store.ping() {
            Ok(()) => {
                state.health = state.health.on_success();
                debug!(cache_name = %self.cache_name, provider = tier.store.provider_name(), "Remote cache connected");
                Some(&tier.store)
            }
            Err(e) => {
                state.health = state.health.on_failure();
                warn!(cache_name = %self.cache_name, provider = tier.store.provider_name(), error = %e, "Remote cache unavailable");
                None
            }
        }
    }

    fn remote_failed(&self, operation: &str, error: &Error) {
        warn!(cache_name = %self.cache_name, operation, error = %error, "Remote cache operation failed, falling back to disk");
        if let Some(tier) = &self.remote {
            let mut state = tier.probe_state();
            state.health = state.health.on_failure();
            state.last_probe = Some(Instant::now());
        }
    }

    fn read_disk(&self, key: &CacheKey, ttl: Duration) -> Option<Value> {
        let record = match self.disk.read(key) {
            Ok(record) => record?,
            Err(e) => {
                debug!(cache_name = %self.cache_name, key = %key, error = %e, "Removing unreadable disk record");
                self.discard(key);
                return None;
            }
        };

        if !record.is_fresh(Utc::now(), ttl) {
            self.discard(key);
            return None;
        }

        match self.codec.decode(&record.value) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(cache_name = %self.cache_name, key = %key, error = %e, "Removing undecodable disk record");
                self.discard(key);
                None
            }
        }
    }

    fn write_disk(&self, key: &CacheKey, bytes: Vec<u8>, ttl: Duration) -> bool {
        if !self.disk.is_available() {
            return false;
        }

        let now = Utc::now();
        if let Err(e) = self.disk.purge_expired(now) {
            debug!(cache_name = %self.cache_name, error = %e, "Expired record purge failed");
        }

        let written = CacheRecord::new(bytes, ttl, now).and_then(|record| self.disk.write(key, &record));
        match written {
            Ok(()) => {
                Counters::bump(&self.counters.disk_writes);
                true
            }
            Err(e) => {
                warn!(cache_name = %self.cache_name, key = %key, error = %e, "Disk cache write failed");
                false
            }
        }
    }

    fn discard(&self, key: &CacheKey) {
        if let Err(e) = self.disk.remove(key) {
            debug!(cache_name = %self.cache_name, key = %key, error = %e, "Failed to remove stale record");
        }
    }
}

impl fmt::Debug for HybridCacheEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HybridCacheEngine")
            .field("cache_name", &self.cache_name)
            .field("remote_health", &self.remote_health())
            .field("disk", &self.disk.directory())
            .field("codec", &self.codec.name())
            .finish()
    }
}
