//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Key layout and default TTL are defined in `tiercache_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "tiercache.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "tiercache";

/// Environment variable prefix for configuration (`TIERCACHE__SECTION__FIELD`)
pub const CONFIG_ENV_PREFIX: &str = "TIERCACHE";

/// Separator between nested configuration keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LEGACY ENVIRONMENT VARIABLES
// ============================================================================

/// Remote store host
pub const ENV_REDIS_HOST: &str = "REDIS_HOST";

/// Remote store port
pub const ENV_REDIS_PORT: &str = "REDIS_PORT";

/// Remote store default database index
pub const ENV_REDIS_DB: &str = "REDIS_DB";

/// Remote store password
pub const ENV_REDIS_PASSWORD: &str = "REDIS_PASSWORD";

/// Prefix of per-namespace database overrides (`REDIS_DB_<CACHE_NAME>`)
pub const ENV_REDIS_DB_PREFIX: &str = "REDIS_DB_";

/// Disk tier base directory
pub const ENV_CACHE_DIR: &str = "CACHE_DIR";

// ============================================================================
// CACHE CONSTANTS
// ============================================================================

/// Directory under the OS temp dir used when no base directory is configured
pub const DISK_CACHE_DIR_NAME: &str = "tiercache";

/// Default remote connect timeout in milliseconds
pub const REMOTE_CONNECT_TIMEOUT_MS: u64 = 1000;

/// Default remote operation timeout in milliseconds
pub const REMOTE_OPERATION_TIMEOUT_MS: u64 = 1000;

/// Seconds a degraded remote tier is left alone before the next probe
pub const REMOTE_REPROBE_INTERVAL_SECS: u64 = 30;

/// Default remote store host
pub const REMOTE_DEFAULT_HOST: &str = "localhost";

/// Default remote store port
pub const REMOTE_DEFAULT_PORT: u16 = 6379;

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "TIERCACHE_LOG";

/// File stem used for log files when the configured path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "tiercache";
