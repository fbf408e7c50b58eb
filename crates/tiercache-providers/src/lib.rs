// Allow collapsible_if for complex conditional logic
#![allow(clippy::collapsible_if)]

//! # Tiercache - Provider Implementations
//!
//! Adapters implementing the ports defined in `tiercache-domain`, plus the
//! disk tier used as the degradation path of every namespace.
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Remote tier | `RemoteStore` | Redis, Memory (Moka) |
//! | Disk tier | - | `DiskStore` |
//! | Codec | `ValueCodec` | Json |
//! | Resolution | `Resolver` | `StaticResolver` |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! tiercache-providers = { version = "0.1", default-features = false, features = ["remote-memory"] }
//! ```

pub use tiercache_domain::error::{Error, Result};
pub use tiercache_domain::ports::{RemoteStore, Resolver, ValueCodec};

/// Provider-specific constants
pub mod constants;

/// Shared utilities for provider implementations
pub mod utils;

/// Value codecs
pub mod codec;

/// Filesystem-backed cache tier
pub mod disk;

/// Remote store implementations
pub mod remote;

/// Resolver implementations
pub mod resolver;
