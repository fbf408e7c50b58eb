//! Environment variable configuration sources
//!
//! These tests modify environment variables and must run sequentially:
//!
//! ```bash
//! cargo test -p tiercache-infrastructure --test unit config_env -- --test-threads=1 --ignored
//! ```
//!
//! # Safety
//!
//! `env::set_var`/`env::remove_var` are `unsafe` in Rust 2024. Tests MUST run
//! with `--test-threads=1` to prevent data races.

use std::env;
use std::path::PathBuf;
use tiercache_infrastructure::config::ConfigLoader;

fn set_env(key: &str, value: &str) {
    // SAFETY: Tests must run with --test-threads=1
    unsafe {
        env::set_var(key, value);
    }
}

fn remove_env(key: &str) {
    // SAFETY: Tests must run with --test-threads=1
    unsafe {
        env::remove_var(key);
    }
}

fn loader() -> ConfigLoader {
    let missing = env::temp_dir().join("tiercache-env-tests-missing.toml");
    ConfigLoader::new().with_config_path(missing)
}

#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_legacy_redis_variables() {
    set_env("REDIS_HOST", "redis.internal");
    set_env("REDIS_PORT", "6380");
    set_env("REDIS_DB", "4");
    set_env("REDIS_PASSWORD", "s3cret");

    let config = loader().load().expect("Should load config");
    assert_eq!(config.cache.remote.host, "redis.internal");
    assert_eq!(config.cache.remote.port, 6380);
    assert_eq!(config.cache.remote.db, 4);
    assert_eq!(config.cache.remote.password.as_deref(), Some("s3cret"));

    remove_env("REDIS_HOST");
    remove_env("REDIS_PORT");
    remove_env("REDIS_DB");
    remove_env("REDIS_PASSWORD");
}

#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_per_namespace_database() {
    set_env("REDIS_DB_SETTINGS", "7");

    let config = loader().load().expect("Should load config");
    assert_eq!(config.cache.remote.db_for("settings"), 7);
    assert_eq!(config.cache.remote.db_for("other"), 0);

    remove_env("REDIS_DB_SETTINGS");
}

#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_cache_dir_variable() {
    set_env("CACHE_DIR", "/srv/cache");

    let config = loader().load().expect("Should load config");
    assert_eq!(config.cache.disk.base_dir, Some(PathBuf::from("/srv/cache")));

    remove_env("CACHE_DIR");
}

#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_prefixed_variables_win_over_legacy() {
    set_env("REDIS_HOST", "legacy-host");
    set_env("TIERCACHE__CACHE__REMOTE__HOST", "prefixed-host");

    let config = loader().load().expect("Should load config");
    assert_eq!(config.cache.remote.host, "prefixed-host");

    remove_env("REDIS_HOST");
    remove_env("TIERCACHE__CACHE__REMOTE__HOST");
}

#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_malformed_port_fails_fast() {
    set_env("REDIS_PORT", "not-a-port");

    let result = loader().load();
    remove_env("REDIS_PORT");

    let err = result.expect_err("invalid port must be rejected");
    assert!(err.to_string().contains("REDIS_PORT"));
}
