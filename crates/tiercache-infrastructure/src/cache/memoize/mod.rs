//! Call-site memoization
//!
//! Wrappers that put a function behind a hybrid cache namespace
//! ([`HybridCache`], [`MethodCache`]) or behind the object cache
//! ([`CachedResolver`]).
//!
//! | Wrapper | Storage | Key body |
//! |---------|---------|----------|
//! | [`HybridCache`] | Hybrid engine | Canonical JSON of the arguments, or a [`KeyGenerator`] |
//! | [`MethodCache`] | Hybrid engine | Receiver type, method name and arguments |
//! | [`CachedResolver`] | Object cache | `module:class:function` |

pub mod hybrid;
pub mod method;
pub mod object;

pub use hybrid::{HybridCache, Memoized};
pub use method::{MemoizedMethod, MethodCache};
pub use object::CachedResolver;

use super::engine::HybridCacheEngine;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;
use tiercache_domain::constants::{KEY_HASH_LENGTH, KEY_SEPARATOR};
use tiercache_domain::error::Result;
use tiercache_domain::value_objects::{CacheKey, EngineStats};
use tracing::{debug, warn};

/// Computes the key body for a call
///
/// Closures `Fn(&A) -> String` implement this directly.
pub trait KeyGenerator<A: ?Sized>: Send + Sync {
    /// Key body for `args`
    fn compute_key(&self, args: &A) -> String;
}

impl<A: ?Sized, F> KeyGenerator<A> for F
where
    F: Fn(&A) -> String + Send + Sync,
{
    fn compute_key(&self, args: &A) -> String {
        self(args)
    }
}

/// Whether a memoizer consults the cache at all
#[derive(Clone)]
pub enum CacheEnabled {
    /// Fixed at construction
    Static(bool),
    /// Evaluated on every call
    Dynamic(Arc<dyn Fn() -> bool + Send + Sync>),
}

impl CacheEnabled {
    /// Evaluated on every call
    pub fn dynamic<F: Fn() -> bool + Send + Sync + 'static>(check: F) -> Self {
        Self::Dynamic(Arc::new(check))
    }

    /// Current value
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Static(enabled) => *enabled,
            Self::Dynamic(check) => check(),
        }
    }
}

impl Default for CacheEnabled {
    fn default() -> Self {
        Self::Static(true)
    }
}

impl From<bool> for CacheEnabled {
    fn from(enabled: bool) -> Self {
        Self::Static(enabled)
    }
}

impl fmt::Debug for CacheEnabled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(enabled) => f.debug_tuple("Static").field(enabled).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic"),
        }
    }
}

/// Per-call controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Call through without reading or writing the cache
    pub skip_cache: bool,
}

impl CallOptions {
    /// Options that bypass the cache for this call
    pub fn skip_cache() -> Self {
        Self { skip_cache: true }
    }
}

/// Decides whether a result is stored
pub type CacheCondition<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

/// Engine binding and storage rules shared by the memoizers
pub(crate) struct CachePolicy<R> {
    pub(crate) engine: Arc<HybridCacheEngine>,
    pub(crate) prefix: String,
    pub(crate) ttl: Duration,
    pub(crate) enabled: CacheEnabled,
    pub(crate) condition: Option<CacheCondition<R>>,
}

impl<R> CachePolicy<R>
where
    R: Serialize + DeserializeOwned,
{
    /// Serve `key` from the cache or run `compute` and store its result
    ///
    /// Errors from `compute` pass through untouched and are never cached.
    pub(crate) fn run<E>(
        &self,
        key: impl FnOnce() -> Result<CacheKey>,
        options: CallOptions,
        compute: impl FnOnce() -> std::result::Result<R, E>,
    ) -> std::result::Result<R, E> {
        if options.skip_cache || !self.enabled.is_enabled() {
            return compute();
        }

        let key = match key() {
            Ok(key) => key,
            Err(e) => {
                warn!(prefix = %self.prefix, error = %e, "Cache key could not be derived, calling through");
                return compute();
            }
        };

        if let Some(cached) = self.engine.get_by_key(&key, self.ttl) {
            match serde_json::from_value::<R>(cached) {
                Ok(value) => return Ok(value),
                Err(e) => debug!(key = %key, error = %e, "Cached value has unexpected shape"),
            }
        }

        let result = compute()?;
        if self.condition.as_ref().is_none_or(|condition| condition(&result)) {
            self.engine.set_by_key(&key, &result, self.ttl);
        }
        Ok(result)
    }

    /// Remove every entry stored under this prefix
    ///
    /// Only the hash segment is wildcarded, so longer prefixes starting with
    /// this one (`outer::inner`) keep their entries.
    pub(crate) fn clear(&self) -> usize {
        let hash = "?".repeat(KEY_HASH_LENGTH);
        self.engine.clear(&format!("{}{KEY_SEPARATOR}{hash}", self.prefix))
    }

    pub(crate) fn stats(&self) -> EngineStats {
        self.engine.stats()
    }
}

/// Stable key prefix derived from a type name
///
/// Characters that have meaning in glob patterns or file names are replaced,
/// so the prefix can be used with [`HybridCacheEngine::clear`].
pub(crate) fn prefix_from_type_name(type_name: &str) -> String {
    type_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Key prefix used when the caller did not set one
///
/// Every closure defined in one function shares that function's
/// `{{closure}}` type name, so closures also carry the `wrap` call site.
pub(crate) fn default_prefix(type_name: &str, call_site: &Location<'_>) -> String {
    if type_name.contains("{{closure}}") {
        prefix_from_type_name(&format!(
            "{type_name}@{}:{}:{}",
            call_site.file(),
            call_site.line(),
            call_site.column()
        ))
    } else {
        prefix_from_type_name(type_name)
    }
}

/// Last path segment of a type name, without generic arguments
pub(crate) fn short_type_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}
