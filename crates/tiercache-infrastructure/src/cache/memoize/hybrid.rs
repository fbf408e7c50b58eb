//! Function memoization over a hybrid cache namespace

use super::{
    CacheCondition, CacheEnabled, CachePolicy, CallOptions, KeyGenerator, default_prefix,
};
use crate::cache::engine::HybridCacheEngine;
use crate::cache::registry::CacheRegistry;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;
use tiercache_domain::constants::{DEFAULT_CACHE_NAME, DEFAULT_TTL_SECS};
use tiercache_domain::error::Result;
use tiercache_domain::value_objects::{CacheKey, EngineStats};

/// Builder for [`Memoized`] functions
///
/// The engine is chosen in this order: an explicit [`engine`](Self::engine),
/// the namespace `cache_name` of an explicit [`registry`](Self::registry),
/// then the namespace `cache_name` of [`CacheRegistry::global`].
///
/// # Example
///
/// ```
/// use tiercache_infrastructure::cache::{CacheRegistry, HybridCache};
/// use tiercache_infrastructure::config::CacheSystemConfig;
/// use std::time::Duration;
///
/// let dir = tempfile::tempdir().unwrap();
/// let registry = CacheRegistry::new(CacheSystemConfig::disk_only(dir.path()));
///
/// let square = HybridCache::new()
///     .cache_name("math")
///     .ttl(Duration::from_secs(60))
///     .registry(&registry)
///     .wrap(|n: &u64| Ok::<_, std::io::Error>(n * n));
///
/// assert_eq!(square.call(&12).unwrap(), 144);
/// ```
#[derive(Default)]
pub struct HybridCache<'r> {
    ttl: Option<Duration>,
    key_prefix: Option<String>,
    cache_name: Option<String>,
    engine: Option<Arc<HybridCacheEngine>>,
    registry: Option<&'r CacheRegistry>,
    enabled: CacheEnabled,
}

impl<'r> HybridCache<'r> {
    /// Start a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Time to live of stored results
    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Key prefix; defaults to the wrapped function's type name
    #[must_use]
    pub fn key_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Namespace to store results in
    #[must_use]
    pub fn cache_name<S: Into<String>>(mut self, cache_name: S) -> Self {
        self.cache_name = Some(cache_name.into());
        self
    }

    /// Use this engine directly
    #[must_use]
    pub fn engine(mut self, engine: Arc<HybridCacheEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Resolve the namespace through this registry
    #[must_use]
    pub fn registry(mut self, registry: &'r CacheRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Static or per-call switch for the whole cache
    #[must_use]
    pub fn enabled<C: Into<CacheEnabled>>(mut self, enabled: C) -> Self {
        self.enabled = enabled.into();
        self
    }

    /// Memoize `function`
    ///
    /// Without a [`key_prefix`](Self::key_prefix), closures are told apart by
    /// where `wrap` is called, so each call site owns its own entries.
    #[track_caller]
    pub fn wrap<A, R, E, F>(self, function: F) -> Memoized<A, R, E>
    where
        A: Serialize + ?Sized,
        R: Serialize + DeserializeOwned,
        F: Fn(&A) -> std::result::Result<R, E> + Send + Sync + 'static,
    {
        let call_site = Location::caller();
        let prefix = self
            .key_prefix
            .unwrap_or_else(|| default_prefix(std::any::type_name::<F>(), call_site));
        let cache_name = self.cache_name.as_deref().unwrap_or(DEFAULT_CACHE_NAME);
        let (engine, default_ttl) = resolve_engine(self.engine, self.registry, cache_name);

        Memoized {
            policy: CachePolicy {
                engine,
                prefix,
                ttl: self.ttl.unwrap_or(default_ttl),
                enabled: self.enabled,
                condition: None,
            },
            key_generator: None,
            function: Box::new(function),
        }
    }
}

pub(super) fn resolve_engine(
    engine: Option<Arc<HybridCacheEngine>>,
    registry: Option<&CacheRegistry>,
    cache_name: &str,
) -> (Arc<HybridCacheEngine>, Duration) {
    match (engine, registry) {
        (Some(engine), Some(registry)) => (engine, registry.default_ttl()),
        (Some(engine), None) => (engine, Duration::from_secs(DEFAULT_TTL_SECS)),
        (None, Some(registry)) => (registry.get_or_create(cache_name), registry.default_ttl()),
        (None, None) => {
            let registry = CacheRegistry::global();
            (registry.get_or_create(cache_name), registry.default_ttl())
        }
    }
}

/// A function whose results are cached
pub struct Memoized<A: ?Sized, R, E> {
    policy: CachePolicy<R>,
    key_generator: Option<Arc<dyn KeyGenerator<A>>>,
    function: Box<dyn Fn(&A) -> std::result::Result<R, E> + Send + Sync>,
}

impl<A, R, E> Memoized<A, R, E>
where
    A: Serialize + ?Sized,
    R: Serialize + DeserializeOwned,
{
    /// Store a result only when `condition` holds for it
    #[must_use]
    pub fn with_condition<C>(mut self, condition: C) -> Self
    where
        C: Fn(&R) -> bool + Send + Sync + 'static,
    {
        let condition: CacheCondition<R> = Arc::new(condition);
        self.policy.condition = Some(condition);
        self
    }

    /// Compute the key body with `generator` instead of the arguments' JSON
    #[must_use]
    pub fn with_key_generator<G>(mut self, generator: G) -> Self
    where
        G: KeyGenerator<A> + 'static,
    {
        self.key_generator = Some(Arc::new(generator));
        self
    }

    /// Call, serving from the cache when possible
    pub fn call(&self, args: &A) -> std::result::Result<R, E> {
        self.call_with(args, CallOptions::default())
    }

    /// Call with per-call options
    pub fn call_with(&self, args: &A, options: CallOptions) -> std::result::Result<R, E> {
        self.policy
            .run(|| self.cache_key(args), options, || (self.function)(args))
    }

    /// Storage key used for `args`
    pub fn cache_key(&self, args: &A) -> Result<CacheKey> {
        let engine = &self.policy.engine;
        match &self.key_generator {
            Some(generator) => engine.generate_key(&self.policy.prefix, &generator.compute_key(args)),
            None => engine.generate_key(&self.policy.prefix, args),
        }
    }

    /// Remove every cached result of this function
    pub fn cache_clear(&self) -> usize {
        self.policy.clear()
    }

    /// Remove the cached result for `args`
    pub fn cache_delete(&self, args: &A) -> bool {
        self.cache_key(args)
            .is_ok_and(|key| self.policy.engine.delete_by_key(&key))
    }

    /// Statistics of the backing namespace
    pub fn cache_stats(&self) -> EngineStats {
        self.policy.stats()
    }

    /// Prefix of every key this function stores
    pub fn key_prefix(&self) -> &str {
        &self.policy.prefix
    }

    /// Time to live of stored results
    pub fn ttl(&self) -> Duration {
        self.policy.ttl
    }
}

impl<A: ?Sized, R, E> fmt::Debug for Memoized<A, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("cache_name", &self.policy.engine.cache_name())
            .field("prefix", &self.policy.prefix)
            .field("ttl", &self.policy.ttl)
            .field("enabled", &self.policy.enabled)
            .finish_non_exhaustive()
    }
}
