//! Provider Constants

// ============================================================================
// DISK STORE CONSTANTS
// ============================================================================

/// File used to verify write permission on the namespace directory
pub const DISK_WRITE_PROBE_FILE: &str = ".write-test";

/// Suffix of in-flight temporary record files
pub const DISK_TEMP_SUFFIX: &str = "tmp";

// ============================================================================
// REDIS CONSTANTS
// ============================================================================

/// Default Redis host
pub const REDIS_DEFAULT_HOST: &str = "localhost";

/// Default Redis port
pub const REDIS_DEFAULT_PORT: u16 = 6379;

/// Keys requested per SCAN round trip
pub const REDIS_SCAN_COUNT: usize = 100;

/// Default connect timeout in milliseconds
pub const REDIS_CONNECT_TIMEOUT_MS: u64 = 1000;

/// Default per-operation timeout in milliseconds
pub const REDIS_OPERATION_TIMEOUT_MS: u64 = 1000;

// ============================================================================
// MEMORY STORE CONSTANTS
// ============================================================================

/// Default entry capacity of the in-process remote store
pub const MEMORY_STORE_DEFAULT_CAPACITY: u64 = 10_000;
