//! Cache key derivation

use serde::Serialize;
use serde_json::json;
use tiercache_domain::value_objects::{CacheKey, file_pattern};

#[derive(Serialize)]
struct Query {
    tenant: u32,
    filters: Vec<&'static str>,
}

#[test]
fn test_key_layout() {
    let key = CacheKey::generate("settings", "tenant", &json!({"id": 42})).unwrap();
    let rendered = key.to_string();

    assert!(rendered.starts_with("settings:tenant:"));
    assert_eq!(key.hash().len(), 16);
    assert!(key.hash().chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_structs_and_equivalent_json_share_a_key() {
    let from_struct = CacheKey::generate(
        "reports",
        "query",
        &Query {
            tenant: 7,
            filters: vec!["open"],
        },
    )
    .unwrap();
    let from_json =
        CacheKey::generate("reports", "query", &json!({"filters": ["open"], "tenant": 7})).unwrap();

    assert_eq!(from_struct, from_json);
}

#[test]
fn test_array_order_matters() {
    let a = CacheKey::generate("reports", "query", &json!(["a", "b"])).unwrap();
    let b = CacheKey::generate("reports", "query", &json!(["b", "a"])).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_namespaces_do_not_collide() {
    let a = CacheKey::for_logical_key("settings", "tenant:42");
    let b = CacheKey::for_logical_key("sessions", "tenant:42");
    assert_eq!(a.hash(), b.hash());
    assert_ne!(a, b);
    assert_ne!(a.file_name(), b.file_name());
}

#[test]
fn test_file_pattern_targets_prefix() {
    let key = CacheKey::for_logical_key("settings", "tenant:42");
    let pattern = file_pattern("settings", "tenant:*");

    let stem = pattern.trim_end_matches("*.cache");
    assert!(key.file_name().starts_with(stem));
    assert!(key.file_name().ends_with(".cache"));
}
