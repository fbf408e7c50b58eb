//! Disk store behaviour across instances and threads

use chrono::Utc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tiercache_domain::value_objects::{CacheKey, CacheRecord};
use tiercache_providers::disk::DiskStore;

fn record(value: &str, ttl_secs: u64) -> CacheRecord {
    CacheRecord::new(value.as_bytes().to_vec(), Duration::from_secs(ttl_secs), Utc::now())
        .expect("record")
}

#[test]
fn records_survive_reopening_the_namespace() {
    let temp = tempfile::tempdir().expect("tempdir");
    let key = CacheKey::for_logical_key("settings", "tenant:42");

    DiskStore::open(temp.path(), "settings")
        .write(&key, &record("pro", 60))
        .expect("write");

    let reopened = DiskStore::open(temp.path(), "settings");
    let stored = reopened.read(&key).expect("read").expect("record present");
    assert_eq!(stored.value, b"pro");
}

#[test]
fn records_survive_copying_the_directory() {
    let source = tempfile::tempdir().expect("tempdir");
    let target = tempfile::tempdir().expect("tempdir");
    let key = CacheKey::for_logical_key("ns", "k");

    let store = DiskStore::open(source.path(), "ns");
    store.write(&key, &record("v", 3600)).expect("write");

    let copied_dir = target.path().join("ns");
    std::fs::create_dir_all(&copied_dir).expect("mkdir");
    let file = store.path_for(&key).expect("path");
    std::fs::copy(&file, copied_dir.join(key.file_name())).expect("copy");

    let copy = DiskStore::open(target.path(), "ns");
    let stored = copy.read(&key).expect("read").expect("record present");
    assert!(!stored.is_expired(Utc::now()));
}

#[test]
fn namespaces_are_isolated() {
    let temp = tempfile::tempdir().expect("tempdir");
    let a = DiskStore::open(temp.path(), "a");
    let b = DiskStore::open(temp.path(), "b");

    a.write(&CacheKey::for_logical_key("a", "k"), &record("1", 60))
        .expect("write");

    assert_eq!(a.entry_count(), 1);
    assert_eq!(b.entry_count(), 0);
    assert_eq!(b.remove_matching("b", "*").expect("clear"), 0);
    assert_eq!(a.entry_count(), 1);
}

#[test]
fn concurrent_writers_leave_one_valid_record() {
    let temp = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(DiskStore::open(temp.path(), "race"));
    let key = CacheKey::for_logical_key("race", "shared");

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            let key = key.clone();
            thread::spawn(move || store.write(&key, &record(&format!("v{i}"), 60)))
        })
        .collect();
    for handle in handles {
        handle.join().expect("join").expect("write");
    }

    let stored = store.read(&key).expect("read").expect("record present");
    assert!(String::from_utf8(stored.value).expect("utf8").starts_with('v'));
    assert_eq!(store.entry_count(), 1);
}
