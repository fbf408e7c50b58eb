//! Resolution request normalization

use serde_json::json;
use tiercache_domain::Error;
use tiercache_domain::ports::{ConstructorParameters, ResolveRequest};

#[test]
fn test_names_are_trimmed() {
    let request = ResolveRequest::method(" billing ", " Invoice ", " total ")
        .normalized()
        .unwrap();

    assert_eq!(request.module_name, "billing");
    assert_eq!(request.class_name.as_deref(), Some("Invoice"));
    assert_eq!(request.function_name, "total");
}

#[test]
fn test_blank_class_means_module_function() {
    let request = ResolveRequest::method("billing", "  ", "total")
        .normalized()
        .unwrap();
    assert_eq!(request, ResolveRequest::function("billing", "total"));
}

#[test]
fn test_missing_names_are_rejected() {
    for request in [
        ResolveRequest::function("", "total"),
        ResolveRequest::function("billing", "\t"),
        ResolveRequest::default(),
    ] {
        assert!(matches!(
            request.normalized(),
            Err(Error::InvalidArgument { .. })
        ));
    }
}

#[test]
fn test_constructor_parameters_survive_normalization() {
    let mut params = ConstructorParameters::new();
    params.insert("currency".to_string(), json!("EUR"));

    let request = ResolveRequest::method("billing", "Invoice", "total")
        .with_constructor_parameters(params.clone())
        .normalized()
        .unwrap();
    assert_eq!(request.constructor_parameters, Some(params));
}
