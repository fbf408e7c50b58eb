//! In-process remote store behaviour

use std::time::Duration;
use tiercache_providers::RemoteStore;
use tiercache_providers::remote::MemoryRemoteStore;

#[test]
fn scan_and_delete_by_namespace_pattern() {
    let store = MemoryRemoteStore::new();
    let ttl = Duration::from_secs(60);
    for key in ["settings:tenant:a", "settings:tenant:b", "settings:user:a", "other:tenant:a"] {
        store.set_with_expiry(key, b"x", ttl).expect("set");
    }

    let mut matched = store.scan("settings:tenant:*").expect("scan");
    matched.sort();
    assert_eq!(matched, vec!["settings:tenant:a", "settings:tenant:b"]);

    assert_eq!(store.delete(&matched).expect("delete"), 2);
    assert_eq!(store.delete(&matched).expect("delete again"), 0);
    assert!(store.get("other:tenant:a").expect("get").is_some());
}

#[test]
fn clones_share_entries() {
    let store = MemoryRemoteStore::new();
    let clone = store.clone();
    store
        .set_with_expiry("k", b"v", Duration::from_secs(5))
        .expect("set");
    assert_eq!(clone.get("k").expect("get"), Some(b"v".to_vec()));
}
