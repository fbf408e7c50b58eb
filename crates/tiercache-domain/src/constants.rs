//! Domain layer constants
//!
//! Values every layer agrees on: key layout, default namespace and TTL.
//! Infrastructure tuning knobs live in `tiercache_infrastructure::constants`.

// ============================================================================
// NAMESPACE CONSTANTS
// ============================================================================

/// Namespace used when no cache name is given
pub const DEFAULT_CACHE_NAME: &str = "default";

/// Namespace used by method memoizers when no cache name is given
pub const DEFAULT_METHOD_CACHE_NAME: &str = "method";

// ============================================================================
// KEY CONSTANTS
// ============================================================================

/// Separator between the namespace, prefix and hash of a cache key
pub const KEY_SEPARATOR: char = ':';

/// Prefix applied to logical keys that carry no prefix of their own
pub const DEFAULT_KEY_PREFIX: &str = "cache";

/// Number of hex characters kept from the key digest
pub const KEY_HASH_LENGTH: usize = 16;

/// Replacement for characters that are not filesystem safe
pub const FILE_SAFE_SEPARATOR: char = '_';

/// Extension of disk-resident cache records
pub const CACHE_FILE_EXTENSION: &str = "cache";

// ============================================================================
// TTL CONSTANTS
// ============================================================================

/// Default time to live for cache entries (5 minutes)
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Longest time to live any tier is asked to keep an entry (100 years)
pub const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;
