//! # Tiercache
//!
//! A two-tier cache for short-lived processes. Every named namespace prefers
//! a remote key-value service and falls back to a local disk store when the
//! service is missing or failing. Next to it sits a permanent in-process
//! object cache for dynamically resolved callables, and a set of memoizers
//! that put either cache in front of a function.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use tiercache::{CacheRegistry, CacheSystemConfig, HybridCache};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let registry = CacheRegistry::new(CacheSystemConfig::disk_only(dir.path()));
//!
//! let settings = registry.get_or_create("settings");
//! settings.set("tenant:42", &serde_json::json!({"theme": "dark"}), Duration::from_secs(60));
//! assert!(settings.get("tenant:42", Duration::from_secs(60)).is_some());
//! assert_eq!(settings.clear("tenant:*"), 1);
//!
//! let slow_square = HybridCache::new()
//!     .registry(&registry)
//!     .key_prefix("square")
//!     .wrap(|n: &u64| Ok::<_, std::io::Error>(n * n));
//! assert_eq!(slow_square.call(&9).unwrap(), 81);
//! ```
//!
//! ## Architecture
//!
//! - `domain` - keys, records, errors and the port traits
//! - `providers` - disk store, remote stores, codec and static resolver
//! - `infrastructure` - engine, registry, object cache, memoizers, config, logging

use std::sync::Arc;

/// Domain layer - keys, records, errors and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use tiercache_domain::*;
}

/// Provider layer - storage tiers, codecs and resolvers
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use tiercache_providers::*;
}

/// Infrastructure layer - engine, registry, memoizers, config and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use tiercache_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::ports::{Callable, Component, ResolveRequest, Resolver};
pub use domain::value_objects::{CacheKey, EngineStats, ObjectCacheStats, RemoteHealth};
pub use domain::{Error, Result};

// Re-export the cache API at the crate root
pub use infrastructure::cache::{
    CacheEnabled, CacheRegistry, CachedResolver, CallOptions, HybridCache, HybridCacheEngine,
    Memoized, MemoizedMethod, MethodCache, ObjectCache,
};
pub use infrastructure::config::{AppConfig, CacheSystemConfig, ConfigLoader};
pub use infrastructure::logging::init_logging;

pub use providers::resolver::StaticResolver;

/// Engine for `cache_name` from the process-wide registry
///
/// The registry is configured from the environment on first use.
pub fn get_cache(cache_name: &str) -> Arc<HybridCacheEngine> {
    CacheRegistry::global().get_or_create(cache_name)
}

/// Snapshot of the process-wide object cache
pub fn object_cache_stats() -> ObjectCacheStats {
    ObjectCache::global().get_stats()
}

/// Empty the process-wide object cache
pub fn clear_object_cache() {
    ObjectCache::global().clear();
}
