//! Remote Store Port
//!
//! Contract for the preferred cache tier: a key-value service reached over
//! the network. Implementations must bound every call with short timeouts;
//! the engine treats any error (including a timeout) as a reason to fall
//! back to disk and never retries.
//!
//! ## Implementations
//!
//! - **Redis**: blocking client with connect/operation timeouts
//! - **Memory**: in-process store for single-host deployments and tests

use crate::error::Result;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Remote key-value cache service
pub trait RemoteStore: Send + Sync + fmt::Debug {
    /// Health check
    fn ping(&self) -> Result<()>;

    /// Read the raw bytes stored under `key`
    ///
    /// # Returns
    /// `None` when the key does not exist or has expired
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, expiring after `ttl`
    fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Remove `keys`
    ///
    /// # Returns
    /// The number of keys that existed and were removed
    fn delete(&self, keys: &[String]) -> Result<u64>;

    /// List keys matching a glob `pattern`
    fn scan(&self, pattern: &str) -> Result<Vec<String>>;

    /// Name of this store implementation (e.g., "redis", "memory")
    fn provider_name(&self) -> &str;
}

/// Creates the remote store for a namespace
///
/// Returning `Ok(None)` means the namespace runs without a remote tier.
pub trait RemoteStoreFactory: Send + Sync {
    /// Build the remote store used by `cache_name`
    fn create(&self, cache_name: &str) -> Result<Option<Arc<dyn RemoteStore>>>;
}

/// Factory that never provides a remote tier
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemoteStore;

impl RemoteStoreFactory for NoRemoteStore {
    fn create(&self, _cache_name: &str) -> Result<Option<Arc<dyn RemoteStore>>> {
        Ok(None)
    }
}
