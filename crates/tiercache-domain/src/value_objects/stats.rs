//! Cache statistics

use super::RemoteHealth;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-tier operation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounters {
    /// Reads served by the remote tier
    pub remote_hits: u64,
    /// Reads served by the disk tier
    pub disk_hits: u64,
    /// Reads that found nothing usable
    pub misses: u64,
    /// Successful remote writes
    pub remote_writes: u64,
    /// Successful disk writes
    pub disk_writes: u64,
}

impl TierCounters {
    /// Fraction of reads that were hits (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.remote_hits + self.disk_hits;
        let total = hits + self.misses;
        if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Point-in-time view of a hybrid cache namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Namespace name
    pub cache_name: String,
    /// Whether the remote tier currently receives operations
    pub remote_available: bool,
    /// Detailed remote tier state
    pub remote_health: RemoteHealth,
    /// Whether the disk tier passed its write self-test
    pub disk_available: bool,
    /// Namespace directory of the disk tier
    pub disk_path: Option<PathBuf>,
    /// Operation counters since the engine was created
    pub counters: TierCounters,
}

/// Snapshot of the object cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectCacheStats {
    /// Number of cached objects
    pub size: usize,
    /// Keys of the cached objects
    pub keys: Vec<String>,
}
