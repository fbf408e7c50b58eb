//! Unit tests for domain error types

use tiercache_domain::Error;

#[test]
fn test_not_found_error() {
    let error = Error::not_found("module 'billing'");
    match error {
        Error::NotFound { resource } => assert_eq!(resource, "module 'billing'"),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_invalid_argument_error() {
    let error = Error::invalid_argument("module_name is required");
    assert_eq!(error.to_string(), "Invalid argument: module_name is required");
}

#[test]
fn test_remote_errors_are_classified() {
    assert!(Error::remote("connection refused").is_remote());
    assert!(!Error::cache("record too large").is_remote());
    assert!(!Error::io("disk full").is_remote());
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let error: Error = io_error.into();
    assert!(matches!(error, Error::IoSimple { .. }));
    assert!(error.to_string().contains("read-only"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_error.into();
    assert!(matches!(error, Error::Json { .. }));
}
