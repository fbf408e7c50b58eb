//! Permanent object cache
//!
//! Memoizes dynamically resolved objects keyed by
//! `module:class:function` (or `module:function`). Entries never expire;
//! they live until removed or until the process exits. One mutex guards the
//! whole map and no I/O happens while it is held.

use once_cell::sync::Lazy;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tiercache_domain::constants::KEY_SEPARATOR;
use tiercache_domain::value_objects::ObjectCacheStats;
use tracing::debug;

/// Shared, type-erased cached object
pub type CachedObject = Arc<dyn Any + Send + Sync>;

static GLOBAL_OBJECT_CACHE: Lazy<Arc<ObjectCache>> = Lazy::new(|| Arc::new(ObjectCache::new()));

/// Thread-safe map of resolved objects
#[derive(Default)]
pub struct ObjectCache {
    entries: Mutex<HashMap<String, CachedObject>>,
}

impl ObjectCache {
    /// Create an empty, isolated cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache
    pub fn global() -> Arc<ObjectCache> {
        Arc::clone(&GLOBAL_OBJECT_CACHE)
    }

    /// Entry key for a resolution target
    ///
    /// # Example
    ///
    /// ```
    /// use tiercache_infrastructure::cache::ObjectCache;
    ///
    /// assert_eq!(ObjectCache::key("billing", Some("Invoice"), "total"), "billing:Invoice:total");
    /// assert_eq!(ObjectCache::key("billing", None, "total"), "billing:total");
    /// ```
    pub fn key(module_name: &str, class_name: Option<&str>, function_name: &str) -> String {
        match class_name {
            Some(class_name) => {
                format!("{module_name}{KEY_SEPARATOR}{class_name}{KEY_SEPARATOR}{function_name}")
            }
            None => format!("{module_name}{KEY_SEPARATOR}{function_name}"),
        }
    }

    /// Cached object for a target
    pub fn get(
        &self,
        module_name: &str,
        class_name: Option<&str>,
        function_name: &str,
    ) -> Option<CachedObject> {
        let key = Self::key(module_name, class_name, function_name);
        self.lock().get(&key).cloned()
    }

    /// Cached object for a target, if it has type `T`
    pub fn get_as<T: Any + Send + Sync>(
        &self,
        module_name: &str,
        class_name: Option<&str>,
        function_name: &str,
    ) -> Option<Arc<T>> {
        self.get(module_name, class_name, function_name)?
            .downcast::<T>()
            .ok()
    }

    /// Cache an object for a target, replacing any previous entry
    pub fn set(
        &self,
        module_name: &str,
        class_name: Option<&str>,
        function_name: &str,
        value: CachedObject,
    ) {
        let key = Self::key(module_name, class_name, function_name);
        debug!(key = %key, "Object cached");
        self.lock().insert(key, value);
    }

    /// Remove the entry for a target
    ///
    /// # Returns
    /// True if an entry was removed
    pub fn remove(&self, module_name: &str, class_name: Option<&str>, function_name: &str) -> bool {
        let key = Self::key(module_name, class_name, function_name);
        self.lock().remove(&key).is_some()
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached objects
    pub fn size(&self) -> usize {
        self.lock().len()
    }

    /// Size and sorted keys
    pub fn get_stats(&self) -> ObjectCacheStats {
        let entries = self.lock();
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        ObjectCacheStats {
            size: entries.len(),
            keys,
        }
    }

    // Entries stay consistent even if a holder panicked: every critical
    // section is a single map operation.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CachedObject>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl fmt::Debug for ObjectCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectCache")
            .field("size", &self.size())
            .finish()
    }
}
