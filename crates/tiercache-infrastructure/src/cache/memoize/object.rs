//! Resolution memoization over the object cache

use crate::cache::object_cache::ObjectCache;
use std::fmt;
use std::sync::Arc;
use tiercache_domain::error::Result;
use tiercache_domain::ports::{Callable, ResolveRequest, Resolver};
use tracing::debug;

/// Resolver that resolves each target once per process
///
/// Successful resolutions are stored in the [`ObjectCache`] and served from
/// there afterwards; failures are returned as-is and not remembered. When a
/// request carries constructor parameters and the cached callable is a bound
/// method, the cached instance is reconfigured with them before it is
/// returned.
///
/// # Example
///
/// ```
/// use tiercache_infrastructure::cache::{CachedResolver, ObjectCache};
/// use tiercache_providers::resolver::StaticResolver;
/// use tiercache_domain::ports::{ResolveRequest, Resolver};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let resolver = CachedResolver::with_cache(
///     StaticResolver::new().with_function("math", "inc", |v| Ok(json!(v.as_i64().unwrap_or(0) + 1))),
///     Arc::new(ObjectCache::new()),
/// );
///
/// let request = ResolveRequest::function("math", "inc");
/// let first = resolver.resolve(&request).unwrap();
/// let second = resolver.resolve(&request).unwrap();
/// assert!(first.ptr_eq(&second));
/// ```
pub struct CachedResolver<R> {
    inner: R,
    cache: Arc<ObjectCache>,
}

impl<R: Resolver> CachedResolver<R> {
    /// Memoize `inner` in the process-wide object cache
    pub fn new(inner: R) -> Self {
        Self::with_cache(inner, ObjectCache::global())
    }

    /// Memoize `inner` in `cache`
    pub fn with_cache(inner: R, cache: Arc<ObjectCache>) -> Self {
        Self { inner, cache }
    }

    /// Backing object cache
    pub fn cache(&self) -> &Arc<ObjectCache> {
        &self.cache
    }

    /// Wrapped resolver
    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: Resolver> Resolver for CachedResolver<R> {
    fn resolve(&self, request: &ResolveRequest) -> Result<Callable> {
        let request = request.normalized()?;
        let module = request.module_name.as_str();
        let class = request.class_name.as_deref();
        let function = request.function_name.as_str();

        if let Some(cached) = self.cache.get_as::<Callable>(module, class, function) {
            if let (Some(params), Some(instance)) =
                (&request.constructor_parameters, cached.instance())
            {
                instance.configure(params)?;
            }
            return Ok(Callable::clone(&cached));
        }

        let callable = self.inner.resolve(&request)?;
        self.cache
            .set(module, class, function, Arc::new(callable.clone()));
        debug!(module, class, function, "Resolved and cached");
        Ok(callable)
    }
}

impl<R> fmt::Debug for CachedResolver<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedResolver")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
