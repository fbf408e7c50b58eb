//! Resolver implementations
//!
//! Rust has no runtime import facility, so dynamic resolution is served from
//! an explicit registration table: modules register free functions and
//! component factories by name, and lookups go through the [`Resolver`]
//! port.
//!
//! [`Resolver`]: tiercache_domain::ports::Resolver

pub mod registry;

pub use registry::{ComponentFactory, StaticResolver};
