//! Configuration loading from files and the builder

use std::time::Duration;
use tiercache_infrastructure::config::{
    AppConfig, ConfigBuilder, ConfigLoader, LoggingConfig, RemoteProvider,
};

/// Loader that only sees the given file
fn isolated_loader(path: &std::path::Path) -> ConfigLoader {
    ConfigLoader::new()
        .with_config_path(path)
        .with_env_prefix("TIERCACHE_UNIT_TEST_UNUSED")
        .without_legacy_env()
}

#[test]
fn test_defaults_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = isolated_loader(&dir.path().join("missing.toml"))
        .load()
        .expect("defaults should validate");

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.cache.default_ttl(), Duration::from_secs(300));
    assert!(config.cache.remote.enabled);
    assert_eq!(config.cache.remote.port, 6379);
}

#[test]
fn test_toml_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiercache.toml");
    std::fs::write(
        &path,
        r#"
[logging]
level = "debug"

[cache]
default_ttl_secs = 60

[cache.disk]
base_dir = "/var/cache/app"

[cache.remote]
provider = "memory"
host = "cache.internal"
db = 2

[cache.remote.db_overrides]
settings = 5
"#,
    )
    .unwrap();

    let config = isolated_loader(&path).load().unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.cache.default_ttl_secs, 60);
    assert_eq!(
        config.cache.disk.resolved_base_dir(),
        std::path::PathBuf::from("/var/cache/app")
    );
    assert_eq!(config.cache.remote.provider, RemoteProvider::Memory);
    assert_eq!(config.cache.remote.host, "cache.internal");
    assert_eq!(config.cache.remote.db_for("settings"), 5);
    assert_eq!(config.cache.remote.db_for("SETTINGS"), 5);
    assert_eq!(config.cache.remote.db_for("other"), 2);
    // Untouched keys keep their defaults
    assert_eq!(config.cache.remote.port, 6379);
}

#[test]
fn test_invalid_file_values_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[cache]\ndefault_ttl_secs = 0\n").unwrap();

    let err = isolated_loader(&path).load().unwrap_err();
    assert!(err.to_string().contains("TTL"), "unexpected error: {err}");
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.toml");

    let mut config = ConfigBuilder::new()
        .with_disk_dir(dir.path().join("cache"))
        .without_remote()
        .with_logging(LoggingConfig {
            level: "warn".to_string(),
            json_format: true,
            file_output: None,
        })
        .build()
        .unwrap();
    config.cache.remote.db_overrides.insert("jobs".to_string(), 3);

    let loader = isolated_loader(&path);
    loader.save_to_file(&config, &path).unwrap();
    assert_eq!(loader.load().unwrap(), config);
}

#[test]
fn test_builder_validates() {
    let mut cache = tiercache_infrastructure::config::CacheSystemConfig::default();
    cache.remote.host = "  ".to_string();

    assert!(ConfigBuilder::new().with_cache(cache.clone()).build().is_err());

    cache.remote.enabled = false;
    assert!(ConfigBuilder::new().with_cache(cache).build().is_ok());
}
