//! Hybrid engine behaviour through the registry

use crate::test_utils::{BrokenRemote, disk_registry, engine_with_remote, registry_with_remote};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;
use tiercache_domain::value_objects::RemoteHealth;
use tiercache_providers::remote::MemoryRemoteStore;

const MINUTE: Duration = Duration::from_secs(60);

#[test]
fn test_registry_hands_out_one_engine_per_name_across_threads() {
    let (_dir, registry) = disk_registry();
    let registry = Arc::new(registry);

    let engines: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.get_or_create("settings"))
        })
        .map(|handle| handle.join().unwrap())
        .collect();

    for engine in &engines[1..] {
        assert!(Arc::ptr_eq(&engines[0], engine));
    }
    assert_eq!(registry.names(), vec!["settings"]);
}

#[test]
fn test_entry_expires_after_its_ttl() {
    let (_dir, registry) = disk_registry();
    let engine = registry.get_or_create("short");

    let record_path = engine
        .stats()
        .disk_path
        .unwrap()
        .join(engine.key_for("token").file_name());

    assert!(engine.set("token", &"abc", Duration::from_secs(1)));
    assert_eq!(engine.get("token", MINUTE), Some(json!("abc")));
    assert!(record_path.exists());

    thread::sleep(Duration::from_millis(1100));
    assert_eq!(engine.get("token", MINUTE), None);
    assert_eq!(engine.stats().counters.misses, 1);
    // The expired read removes the record file too
    assert!(!record_path.exists());
}

#[test]
fn test_clear_expired_removes_stale_files() {
    let (_dir, registry) = disk_registry();
    let engine = registry.get_or_create("purge");
    engine.set("old", &1, Duration::from_secs(1));
    engine.set("fresh", &2, MINUTE);

    let later = Utc::now() + chrono::Duration::seconds(5);
    assert_eq!(engine.clear_expired(later), 1);
    assert_eq!(engine.get("fresh", MINUTE), Some(json!(2)));
}

#[test]
fn test_failing_remote_falls_back_to_disk() {
    let remote = Arc::new(BrokenRemote::default());
    let (dir, _registry) = disk_registry();
    let engine = engine_with_remote(dir.path(), "fallback", remote.clone());

    assert_eq!(engine.remote_health(), RemoteHealth::Degraded);
    assert!(engine.set("user:1", &json!({"name": "ada"}), MINUTE));
    assert_eq!(engine.get("user:1", MINUTE), Some(json!({"name": "ada"})));
    assert!(engine.delete("user:1"));

    // Only the construction-time probe reached the remote
    assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    assert!(engine.stats().counters.disk_writes >= 1);
}

#[test]
fn test_healthy_remote_is_not_mirrored_to_disk() {
    let remote = MemoryRemoteStore::new();
    let (_dir, registry) = registry_with_remote(Arc::new(remote.clone()));
    let engine = registry.get_or_create("remote_only");

    assert_eq!(engine.remote_health(), RemoteHealth::Available);
    assert!(engine.set("plan", &"gold", MINUTE));

    assert_eq!(remote.entry_count(), 1);
    let disk_file = engine
        .stats()
        .disk_path
        .map(|dir| dir.join(engine.key_for("plan").file_name()))
        .unwrap();
    assert!(!disk_file.exists());

    assert_eq!(engine.get("plan", MINUTE), Some(json!("gold")));
    let counters = engine.stats().counters;
    assert_eq!(counters.remote_hits, 1);
    assert_eq!(counters.disk_writes, 0);
}

#[test]
fn test_delete_is_idempotent() {
    let (_dir, registry) = disk_registry();
    let engine = registry.default_engine();

    engine.set("k", &1, MINUTE);
    assert!(engine.delete("k"));
    assert!(!engine.delete("k"));
    assert!(!engine.delete("never-set"));
    assert_eq!(engine.get("k", MINUTE), None);
}

#[test]
fn test_generated_keys_ignore_field_order() {
    let (_dir, registry) = disk_registry();
    let engine = registry.default_engine();

    let a = engine.generate_key("report", &json!({"a": 1, "b": 2})).unwrap();
    let b = engine.generate_key("report", &json!({"b": 2, "a": 1})).unwrap();
    let c = engine.generate_key("report", &json!({"a": 1, "b": 3})).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.namespace(), "default");
    assert_eq!(a.prefix(), "report");
}

#[test]
fn test_settings_scenario() {
    let (_dir, registry) = disk_registry();
    let settings = registry.get_or_create("settings");

    settings.set("tenant:42", &json!({"theme": "dark"}), MINUTE);
    settings.set("tenant:43", &json!({"theme": "light"}), MINUTE);
    settings.set("global", &json!({"beta": true}), MINUTE);

    assert_eq!(settings.get_as::<serde_json::Value>("tenant:42", MINUTE), Some(json!({"theme": "dark"})));
    assert_eq!(settings.clear("tenant:*"), 2);
    assert_eq!(settings.get("tenant:42", MINUTE), None);
    assert_eq!(settings.get("global", MINUTE), Some(json!({"beta": true})));

    // Other namespaces are untouched by a clear
    let other = registry.get_or_create("other");
    other.set("tenant:42", &1, MINUTE);
    assert_eq!(settings.clear_all(), 1);
    assert_eq!(other.get("tenant:42", MINUTE), Some(json!(1)));
}

#[test]
#[ignore = "requires a Redis server on localhost:6379"]
fn test_live_redis_round_trip() {
    use tiercache_infrastructure::cache::{CacheRegistry, ConfiguredRemoteFactory};
    use tiercache_infrastructure::config::CacheSystemConfig;

    let dir = tempfile::tempdir().unwrap();
    let mut config = CacheSystemConfig::disk_only(dir.path());
    config.remote.enabled = true;
    let factory = Arc::new(ConfiguredRemoteFactory::new(config.remote.clone()));
    let registry = CacheRegistry::with_remote_factory(config, factory);
    let engine = registry.get_or_create("tiercache_live_test");

    assert_eq!(engine.remote_health(), RemoteHealth::Available);
    assert!(engine.set("live:1", &json!({"ok": true}), MINUTE));
    assert_eq!(engine.get("live:1", MINUTE), Some(json!({"ok": true})));
    assert!(engine.clear("live:*") >= 1);
    assert_eq!(engine.get("live:1", MINUTE), None);
}
