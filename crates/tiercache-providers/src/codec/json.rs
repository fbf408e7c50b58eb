//! JSON value codec

use serde_json::Value;
use tiercache_domain::error::Result;
use tiercache_domain::ports::ValueCodec;

/// Stores values as compact JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create a new JSON codec
    pub fn new() -> Self {
        Self
    }
}

impl ValueCodec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn name(&self) -> &str {
        "json"
    }
}
