//! Disk-resident cache record
//!
//! Expiry is decided by the embedded `expires_at` field written at `set`
//! time, never by file modification times, so a record keeps its TTL when
//! the cache directory is copied or restored.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stored value together with its absolute expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// When the record was written
    pub stored_at: DateTime<Utc>,
    /// Absolute expiry; the record is absent from this instant on
    pub expires_at: DateTime<Utc>,
    /// Codec-encoded value
    #[serde(with = "payload")]
    pub value: Vec<u8>,
}

impl CacheRecord {
    /// Create a record that expires `ttl` after `now`
    pub fn new(value: Vec<u8>, ttl: Duration, now: DateTime<Utc>) -> Result<Self> {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| Error::invalid_argument(format!("TTL out of range: {ttl:?}")))?;

        Ok(Self {
            stored_at: now,
            expires_at,
            value,
        })
    }

    /// Whether the record is past its expiry at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether the record is usable at `now` for a reader accepting `max_age`
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        if self.is_expired(now) {
            return false;
        }
        match chrono::Duration::from_std(max_age)
            .ok()
            .and_then(|age| self.stored_at.checked_add_signed(age))
        {
            Some(deadline) => now < deadline,
            None => true,
        }
    }

    /// Encode the record for storage
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a stored record
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

mod payload {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
