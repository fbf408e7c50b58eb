//! Error Extension Tests

use std::io;
use tiercache_domain::error::{Error, Result};
use tiercache_infrastructure::error_ext::ErrorContext;

#[test]
fn test_io_context_keeps_source() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");

    let result: Result<()> = Err(io_error).io_context("failed to read record");

    if let Err(Error::Io { source, message }) = result {
        assert!(message.contains("failed to read record"));
        assert!(message.contains("file not found"));
        assert!(source.is_some());
    } else {
        panic!("Expected Io error");
    }
}

#[test]
fn test_config_context() {
    let parse_error = "abc".parse::<u16>().unwrap_err();

    match Err::<u16, _>(parse_error).config_context("Invalid value for REDIS_PORT") {
        Err(Error::Configuration { message, source }) => {
            assert!(message.starts_with("Invalid value for REDIS_PORT"));
            assert!(source.is_some());
        }
        other => panic!("Expected Configuration error, got {other:?}"),
    }
}

#[test]
fn test_remote_context_is_classified_as_remote() {
    let io_error = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");

    let err = Err::<(), _>(io_error).remote_context("PING").unwrap_err();
    assert!(err.is_remote());
}

#[test]
fn test_with_context_is_lazy() {
    let ok: std::result::Result<u8, io::Error> = Ok(1);
    let value = ok
        .with_context(|| -> String { panic!("context must not be built on success") })
        .unwrap();
    assert_eq!(value, 1);

    let err = Err::<u8, _>(io::Error::other("boom"))
        .with_context(|| "decoding")
        .unwrap_err();
    assert!(matches!(err, Error::Internal { ref message } if message == "decoding: boom"));
}
