//! Value Codec Port
//!
//! The engine is agnostic to the stored byte format. Values cross the codec
//! as `serde_json::Value`, so any type whose `Serialize`/`Deserialize`
//! implementations round-trip through JSON round-trips through the cache.

use crate::error::Result;
use serde_json::Value;
use std::fmt;

/// Serialize/deserialize pair used for every stored value
pub trait ValueCodec: Send + Sync + fmt::Debug {
    /// Encode a value into the stored byte form
    fn encode(&self, value: &Value) -> Result<Vec<u8>>;

    /// Decode stored bytes back into a value
    fn decode(&self, bytes: &[u8]) -> Result<Value>;

    /// Name of the codec (e.g., "json")
    fn name(&self) -> &str;
}
