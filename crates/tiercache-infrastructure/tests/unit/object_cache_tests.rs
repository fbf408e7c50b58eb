//! Object cache and resolver memoization

use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tiercache_domain::error::Result;
use tiercache_domain::ports::{Callable, ResolveRequest, Resolver};
use tiercache_infrastructure::cache::{CachedResolver, ObjectCache};
use tiercache_providers::resolver::StaticResolver;

struct CountingResolver {
    inner: StaticResolver,
    calls: Arc<AtomicUsize>,
}

impl Resolver for CountingResolver {
    fn resolve(&self, request: &ResolveRequest) -> Result<Callable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(request)
    }
}

fn counting_resolver() -> (CachedResolver<CountingResolver>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let inner = StaticResolver::new()
        .with_function("pricing", "discount", |v| Ok(json!(v.as_i64().unwrap_or(0) - 10)));
    let resolver = CachedResolver::with_cache(
        CountingResolver {
            inner,
            calls: Arc::clone(&calls),
        },
        Arc::new(ObjectCache::new()),
    );
    (resolver, calls)
}

#[test]
fn test_resolution_happens_once() {
    let (resolver, calls) = counting_resolver();
    let request = ResolveRequest::function("pricing", "discount");

    let first = resolver.resolve(&request).unwrap();
    let second = resolver.resolve(&request).unwrap();

    assert!(first.ptr_eq(&second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.call(json!(100)).unwrap(), json!(90));
}

#[test]
fn test_whitespace_variants_share_an_entry() {
    let (resolver, calls) = counting_resolver();

    resolver.resolve(&ResolveRequest::function("pricing", "discount")).unwrap();
    resolver.resolve(&ResolveRequest::function(" pricing ", "discount ")).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(resolver.cache().get_stats().keys, vec!["pricing:discount"]);
}

#[test]
fn test_unknown_targets_are_retried() {
    let (resolver, calls) = counting_resolver();
    let request = ResolveRequest::function("pricing", "surcharge");

    assert!(resolver.resolve(&request).is_err());
    assert!(resolver.resolve(&request).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(resolver.cache().size(), 0);
}

#[test]
fn test_removed_entry_is_resolved_again() {
    let (resolver, calls) = counting_resolver();
    let request = ResolveRequest::function("pricing", "discount");

    resolver.resolve(&request).unwrap();
    assert!(resolver.cache().remove("pricing", None, "discount"));
    resolver.resolve(&request).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_global_cache_is_shared() {
    let a = ObjectCache::global();
    let b = ObjectCache::global();
    assert!(Arc::ptr_eq(&a, &b));
}
