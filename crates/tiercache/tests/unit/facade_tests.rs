//! The facade exposes a working end-to-end API

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tiercache::{
    CacheRegistry, CacheSystemConfig, CachedResolver, MethodCache, ObjectCache, ResolveRequest,
    Resolver, StaticResolver,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Settings {
    theme: String,
}

struct SettingsService {
    loads: AtomicUsize,
}

impl SettingsService {
    fn load(&self, tenant: &u32) -> Result<Settings, String> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Settings {
            theme: format!("theme-{tenant}"),
        })
    }
}

#[test]
fn test_typed_values_round_trip_through_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let registry = CacheRegistry::new(CacheSystemConfig::disk_only(dir.path()));
    let engine = registry.get_or_create("settings");

    let value = Settings {
        theme: "dark".to_string(),
    };
    assert!(engine.set("tenant:1", &value, Duration::from_secs(60)));
    assert_eq!(engine.get_as::<Settings>("tenant:1", Duration::from_secs(60)), Some(value));
}

#[test]
fn test_method_memoization_through_the_facade() {
    let dir = tempfile::tempdir().unwrap();
    let registry = CacheRegistry::new(CacheSystemConfig::disk_only(dir.path()));
    let load = MethodCache::new()
        .registry(&registry)
        .cache_name("settings")
        .wrap(SettingsService::load);
    let service = SettingsService {
        loads: AtomicUsize::new(0),
    };

    assert_eq!(load.call(&service, &3).unwrap().theme, "theme-3");
    assert_eq!(load.call(&service, &3).unwrap().theme, "theme-3");
    assert_eq!(service.loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_resolver_memoization_through_the_facade() {
    let resolver = CachedResolver::with_cache(
        StaticResolver::new().with_function("text", "upper", |v| {
            Ok(serde_json::json!(v.as_str().unwrap_or_default().to_uppercase()))
        }),
        Arc::new(ObjectCache::new()),
    );

    let upper = resolver.resolve(&ResolveRequest::function("text", "upper")).unwrap();
    assert_eq!(upper.call(serde_json::json!("abc")).unwrap(), serde_json::json!("ABC"));
    assert_eq!(resolver.cache().size(), 1);
}
