//! Cache key derivation
//!
//! A [`CacheKey`] addresses a stored record as `{namespace}:{prefix}:{hash}`.
//! The hash is the first [`KEY_HASH_LENGTH`] hex characters of the SHA-256
//! digest of the canonical JSON encoding of the logical key, or of the raw
//! string when the logical key already is one. Object keys are sorted before
//! encoding so that logically equal keys always hash identically.

use crate::constants::{
    CACHE_FILE_EXTENSION, DEFAULT_KEY_PREFIX, FILE_SAFE_SEPARATOR, KEY_HASH_LENGTH, KEY_SEPARATOR,
};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

/// Hashed, namespaced key used to address a stored record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    namespace: String,
    prefix: String,
    hash: String,
}

impl CacheKey {
    /// Derive a key from arbitrary serializable key data
    ///
    /// # Example
    ///
    /// ```
    /// use tiercache_domain::value_objects::CacheKey;
    /// use serde_json::json;
    ///
    /// let a = CacheKey::generate("settings", "tenant", &json!({"a": 1, "b": 2})).unwrap();
    /// let b = CacheKey::generate("settings", "tenant", &json!({"b": 2, "a": 1})).unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn generate<T: Serialize + ?Sized>(
        namespace: &str,
        prefix: &str,
        key_data: &T,
    ) -> Result<Self> {
        let canonical = canonical_key_string(key_data)?;
        Ok(Self::from_canonical(namespace, prefix, &canonical))
    }

    /// Derive a key from a logical string key
    ///
    /// The part before the last `:` becomes the prefix, so `tenant:42` lands
    /// under `{namespace}:tenant:*`. Keys without a separator use
    /// [`DEFAULT_KEY_PREFIX`]. The hash always covers the whole logical key.
    pub fn for_logical_key(namespace: &str, logical_key: &str) -> Self {
        let prefix = logical_key
            .rsplit_once(KEY_SEPARATOR)
            .map(|(prefix, _)| prefix)
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or(DEFAULT_KEY_PREFIX);
        Self::from_canonical(namespace, prefix, logical_key)
    }

    fn from_canonical(namespace: &str, prefix: &str, canonical: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            prefix: prefix.to_string(),
            hash: key_digest(canonical),
        }
    }

    /// Namespace (cache name) this key belongs to
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Prefix segment of the key
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Fixed-length digest segment of the key
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// File name of the disk record for this key
    pub fn file_name(&self) -> String {
        format!(
            "{}.{}",
            file_safe(&self.to_string(), false),
            CACHE_FILE_EXTENSION
        )
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.namespace,
            self.prefix,
            self.hash,
            sep = KEY_SEPARATOR
        )
    }
}

/// Canonical string form of key data
///
/// Strings are used verbatim; everything else is encoded as JSON with
/// object keys sorted at every depth.
pub fn canonical_key_string<T: Serialize + ?Sized>(key_data: &T) -> Result<String> {
    match serde_json::to_value(key_data)? {
        Value::String(raw) => Ok(raw),
        other => Ok(serde_json::to_string(&sort_keys(other))?),
    }
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Truncated SHA-256 hex digest of a canonical key
pub fn key_digest(canonical: &str) -> String {
    let mut digest = hex::encode(Sha256::digest(canonical.as_bytes()));
    digest.truncate(KEY_HASH_LENGTH);
    digest
}

/// Map a key (or key pattern) onto filesystem-safe characters
///
/// Alphanumerics, `-` and `.` are kept. With `keep_wildcards`, the glob
/// characters `*`, `?`, `[` and `]` survive so a pattern maps onto the same
/// file names as the keys it matches.
pub fn file_safe(raw: &str, keep_wildcards: bool) -> String {
    raw.chars()
        .map(|c| {
            let wildcard = matches!(c, '*' | '?' | '[' | ']');
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' || (keep_wildcards && wildcard) {
                c
            } else {
                FILE_SAFE_SEPARATOR
            }
        })
        .collect()
}

/// Remote-store glob for a namespaced pattern
pub fn remote_pattern(namespace: &str, pattern: &str) -> String {
    format!("{namespace}{KEY_SEPARATOR}{pattern}")
}

/// Disk file-name glob for a namespaced pattern
pub fn file_pattern(namespace: &str, pattern: &str) -> String {
    format!(
        "{}.{}",
        file_safe(&remote_pattern(namespace, pattern), true),
        CACHE_FILE_EXTENSION
    )
}
