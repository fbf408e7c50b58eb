//! Domain Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`CacheKey`] | Hashed, namespaced address of a stored record |
//! | [`CacheRecord`] | Disk-resident value with embedded expiry |
//! | [`RemoteHealth`] | Remote tier state machine |
//! | [`EngineStats`] | Namespace introspection |
//! | [`ObjectCacheStats`] | Object cache introspection |

/// Cache key derivation
pub mod cache_key;
/// Remote tier health
pub mod health;
/// Disk record layout
pub mod record;
/// Statistics snapshots
pub mod stats;

pub use cache_key::{
    CacheKey, canonical_key_string, file_pattern, file_safe, key_digest, remote_pattern,
};
pub use health::RemoteHealth;
pub use record::CacheRecord;
pub use stats::{EngineStats, ObjectCacheStats, TierCounters};
