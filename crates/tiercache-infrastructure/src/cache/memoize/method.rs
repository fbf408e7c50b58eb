//! Method memoization
//!
//! The receiver never enters the key. Instead the key body is scoped by the
//! receiver's type name and the method's name, so two types (or two
//! methods) with identical arguments do not share entries unless scoping is
//! switched off.

use super::hybrid::resolve_engine;
use super::{
    CacheCondition, CacheEnabled, CachePolicy, CallOptions, default_prefix, short_type_name,
};
use crate::cache::engine::HybridCacheEngine;
use crate::cache::registry::CacheRegistry;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;
use tiercache_domain::constants::{DEFAULT_METHOD_CACHE_NAME, KEY_SEPARATOR};
use tiercache_domain::error::Result;
use tiercache_domain::value_objects::{CacheKey, EngineStats, canonical_key_string};

const UNKNOWN_METHOD: &str = "unknown";

/// Builder for [`MemoizedMethod`]s
///
/// # Example
///
/// ```
/// use tiercache_infrastructure::cache::{CacheRegistry, MethodCache};
/// use tiercache_infrastructure::config::CacheSystemConfig;
///
/// struct Settings {
///     region: String,
/// }
///
/// impl Settings {
///     fn lookup(&self, key: &String) -> Result<String, std::io::Error> {
///         Ok(format!("{}:{key}", self.region))
///     }
/// }
///
/// let dir = tempfile::tempdir().unwrap();
/// let registry = CacheRegistry::new(CacheSystemConfig::disk_only(dir.path()));
/// let lookup = MethodCache::new().registry(&registry).wrap(Settings::lookup);
///
/// let settings = Settings { region: "eu".to_string() };
/// assert_eq!(lookup.call(&settings, &"plan".to_string()).unwrap(), "eu:plan");
/// assert!(lookup.key_scope().starts_with("Settings:lookup"));
/// ```
pub struct MethodCache<'r> {
    ttl: Option<Duration>,
    cache_name: String,
    include_class: bool,
    include_method: bool,
    method_name: Option<String>,
    key_prefix: Option<String>,
    engine: Option<Arc<HybridCacheEngine>>,
    registry: Option<&'r CacheRegistry>,
    enabled: CacheEnabled,
}

impl Default for MethodCache<'_> {
    fn default() -> Self {
        Self {
            ttl: None,
            cache_name: DEFAULT_METHOD_CACHE_NAME.to_string(),
            include_class: true,
            include_method: true,
            method_name: None,
            key_prefix: None,
            engine: None,
            registry: None,
            enabled: CacheEnabled::default(),
        }
    }
}

impl<'r> MethodCache<'r> {
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

    /// Namespace to store results in (default `method`)
    #[must_use]
    pub fn cache_name<S: Into<String>>(mut self, cache_name: S) -> Self {
        self.cache_name = cache_name.into();
        self
    }

    /// Scope keys by the receiver's type name
    #[must_use]
    pub fn include_class(mut self, include: bool) -> Self {
        self.include_class = include;
        self
    }

    /// Scope keys by the method name
    #[must_use]
    pub fn include_method(mut self, include: bool) -> Self {
        self.include_method = include;
        self
    }

    /// Method name used in keys
    ///
    /// Defaults to the last segment of the wrapped function's path; closures
    /// have none and fall back to `unknown`.
    #[must_use]
    pub fn method_name<S: Into<String>>(mut self, name: S) -> Self {
        self.method_name = Some(name.into());
        self
    }

    /// Key prefix; defaults to the wrapped function's type name
    #[must_use]
    pub fn key_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.key_prefix = Some(prefix.into());
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

    /// Memoize `method`
    #[track_caller]
    pub fn wrap<S, A, R, E, F>(self, method: F) -> MemoizedMethod<S, A, R, E>
    where
        S: ?Sized,
        A: Serialize + ?Sized,
        R: Serialize + DeserializeOwned,
        F: Fn(&S, &A) -> std::result::Result<R, E> + Send + Sync + 'static,
    {
        let call_site = Location::caller();
        let function_path = std::any::type_name::<F>();

        let mut scope = Vec::new();
        if self.include_class {
            scope.push(short_type_name(std::any::type_name::<S>()).to_string());
        }
        if self.include_method {
            let name = self.method_name.unwrap_or_else(|| {
                let last = short_type_name(function_path);
                if last.starts_with('{') {
                    UNKNOWN_METHOD.to_string()
                } else {
                    last.to_string()
                }
            });
            scope.push(name);
        }

        let prefix = self
            .key_prefix
            .unwrap_or_else(|| default_prefix(function_path, call_site));
        let (engine, default_ttl) = resolve_engine(self.engine, self.registry, &self.cache_name);

        MemoizedMethod {
            policy: CachePolicy {
                engine,
                prefix,
                ttl: self.ttl.unwrap_or(default_ttl),
                enabled: self.enabled,
                condition: None,
            },
            scope,
            method: Box::new(method),
            receiver: PhantomData,
        }
    }
}

/// A method whose results are cached
pub struct MemoizedMethod<S: ?Sized, A: ?Sized, R, E> {
    policy: CachePolicy<R>,
    scope: Vec<String>,
    method: Box<dyn Fn(&S, &A) -> std::result::Result<R, E> + Send + Sync>,
    receiver: PhantomData<fn(&S)>,
}

impl<S, A, R, E> MemoizedMethod<S, A, R, E>
where
    S: ?Sized,
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

    /// Call on `receiver`, serving from the cache when possible
    pub fn call(&self, receiver: &S, args: &A) -> std::result::Result<R, E> {
        self.call_with(receiver, args, CallOptions::default())
    }

    /// Call with per-call options
    pub fn call_with(
        &self,
        receiver: &S,
        args: &A,
        options: CallOptions,
    ) -> std::result::Result<R, E> {
        self.policy
            .run(|| self.cache_key(args), options, || (self.method)(receiver, args))
    }

    /// Storage key used for `args`
    pub fn cache_key(&self, args: &A) -> Result<CacheKey> {
        let mut body = self.key_scope();
        if !body.is_empty() {
            body.push(KEY_SEPARATOR);
        }
        body.push_str(&canonical_key_string(args)?);
        self.policy.engine.generate_key(&self.policy.prefix, &body)
    }

    /// Class and method part of every key body
    pub fn key_scope(&self) -> String {
        self.scope.join(&KEY_SEPARATOR.to_string())
    }

    /// Remove every cached result of this method
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

    /// Prefix of every key this method stores
    pub fn key_prefix(&self) -> &str {
        &self.policy.prefix
    }
}

impl<S: ?Sized, A: ?Sized, R, E> fmt::Debug for MemoizedMethod<S, A, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizedMethod")
            .field("cache_name", &self.policy.engine.cache_name())
            .field("prefix", &self.policy.prefix)
            .field("scope", &self.scope)
            .field("ttl", &self.policy.ttl)
            .finish_non_exhaustive()
    }
}
