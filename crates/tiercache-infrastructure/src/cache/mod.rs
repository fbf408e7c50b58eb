//! Caching subsystem
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`HybridCacheEngine`] | Remote-first, disk-fallback cache for one namespace |
//! | [`CacheRegistry`] | One engine per namespace |
//! | [`ObjectCache`] | Permanent map of resolved objects |
//! | [`memoize`] | Function, method and resolver memoization |

pub mod engine;
pub mod memoize;
pub mod object_cache;
pub mod registry;
pub mod remote;

pub use engine::{EngineOptions, HybridCacheEngine};
pub use memoize::{
    CacheCondition, CacheEnabled, CachedResolver, CallOptions, HybridCache, KeyGenerator,
    Memoized, MemoizedMethod, MethodCache,
};
pub use object_cache::{CachedObject, ObjectCache};
pub use registry::CacheRegistry;
pub use remote::ConfiguredRemoteFactory;
