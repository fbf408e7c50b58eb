//! Remote Store Implementations
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`RedisRemoteStore`] | Distributed | Redis, blocking client with short timeouts |
//! | [`MemoryRemoteStore`] | Local | Moka-backed, shared by every namespace in the process |
//!
//! ## Provider Selection Guide
//!
//! - **Multi Instance**: Use `RedisRemoteStore`
//! - **Single Instance / Testing**: Use `MemoryRemoteStore`

#[cfg(feature = "remote-memory")]
pub mod memory;
#[cfg(feature = "remote-redis")]
pub mod redis;

#[cfg(feature = "remote-memory")]
pub use memory::MemoryRemoteStore;
#[cfg(feature = "remote-redis")]
pub use redis::{RedisConnectionConfig, RedisRemoteStore};
