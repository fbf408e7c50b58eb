//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables
//! and default values.

use crate::config::{AppConfig, CacheSystemConfig, LoggingConfig};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
    ENV_CACHE_DIR, ENV_REDIS_DB, ENV_REDIS_DB_PREFIX, ENV_REDIS_HOST, ENV_REDIS_PASSWORD,
    ENV_REDIS_PORT,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tiercache_domain::error::{Error, Result};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,

    /// Whether `REDIS_*` / `CACHE_DIR` variables are honoured
    legacy_env: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
            legacy_env: true,
        }
    }

    /// Set the configuration file path
    #[must_use]
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    #[must_use]
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Ignore the unprefixed `REDIS_*` and `CACHE_DIR` variables
    #[must_use]
    pub fn without_legacy_env(mut self) -> Self {
        self.legacy_env = false;
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. `REDIS_HOST`, `REDIS_PORT`, `REDIS_DB`, `REDIS_PASSWORD`,
    ///    `REDIS_DB_<CACHE_NAME>` and `CACHE_DIR`
    /// 4. Prefixed variables (e.g., `TIERCACHE__CACHE__REMOTE__HOST`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        if self.legacy_env {
            figment = merge_legacy_env(figment)?;
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}{CONFIG_ENV_SEPARATOR}", self.env_prefix))
                .split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).io_context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_legacy_env(mut figment: Figment) -> Result<Figment> {
    if let Some(host) = non_empty_var(ENV_REDIS_HOST) {
        figment = figment.merge(Serialized::default("cache.remote.host", host));
    }
    if let Some(port) = non_empty_var(ENV_REDIS_PORT) {
        let port: u16 = parse_env_number(ENV_REDIS_PORT, &port)?;
        figment = figment.merge(Serialized::default("cache.remote.port", port));
    }
    if let Some(db) = non_empty_var(ENV_REDIS_DB) {
        let db: u32 = parse_env_number(ENV_REDIS_DB, &db)?;
        figment = figment.merge(Serialized::default("cache.remote.db", db));
    }
    if let Some(password) = non_empty_var(ENV_REDIS_PASSWORD) {
        figment = figment.merge(Serialized::default("cache.remote.password", password));
    }
    if let Some(dir) = non_empty_var(ENV_CACHE_DIR) {
        figment = figment.merge(Serialized::default("cache.disk.base_dir", dir));
    }

    for (name, value) in env::vars() {
        let Some(cache_name) = name.strip_prefix(ENV_REDIS_DB_PREFIX) else {
            continue;
        };
        if cache_name.is_empty() || cache_name.contains('.') {
            continue;
        }
        let db: u32 = parse_env_number(&name, &value)?;
        figment = figment.merge(Serialized::default(
            &format!("cache.remote.db_overrides.{}", cache_name.to_lowercase()),
            db,
        ));
    }

    Ok(figment)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env_number<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .config_context(format!("Invalid value for {name}: {value:?}"))
}

/// Validate application configuration
fn validate_app_config(config: &AppConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    validate_cache_config(&config.cache)
}

fn validate_cache_config(cache: &CacheSystemConfig) -> Result<()> {
    if cache.default_ttl_secs == 0 {
        return Err(Error::config("Default cache TTL cannot be 0"));
    }

    let remote = &cache.remote;
    if remote.enabled {
        if remote.port == 0 {
            return Err(Error::config(
                "Remote cache port cannot be 0 when the remote tier is enabled",
            ));
        }
        if remote.connect_timeout_ms == 0 || remote.operation_timeout_ms == 0 {
            return Err(Error::config("Remote cache timeouts cannot be 0"));
        }
        if remote.host.trim().is_empty() {
            return Err(Error::config("Remote cache host cannot be empty"));
        }
    }
    Ok(())
}

/// Configuration builder for programmatic configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set logging configuration
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Set cache configuration
    #[must_use]
    pub fn with_cache(mut self, cache: CacheSystemConfig) -> Self {
        self.config.cache = cache;
        self
    }

    /// Set the disk tier base directory
    #[must_use]
    pub fn with_disk_dir<P: Into<PathBuf>>(mut self, base_dir: P) -> Self {
        self.config.cache.disk.base_dir = Some(base_dir.into());
        self
    }

    /// Disable the remote tier
    #[must_use]
    pub fn without_remote(mut self) -> Self {
        self.config.cache.remote.enabled = false;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig> {
        validate_app_config(&self.config)?;
        Ok(self.config)
    }
}
