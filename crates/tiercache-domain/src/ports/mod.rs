//! Domain Port Interfaces
//!
//! Contracts implemented by the providers crate and consumed by the
//! infrastructure layer.
//!
//! | Port | Description |
//! |------|-------------|
//! | [`RemoteStore`] | Preferred network cache tier |
//! | [`RemoteStoreFactory`] | Per-namespace remote tier construction |
//! | [`ValueCodec`] | Serialize/deserialize pair for stored values |
//! | [`Resolver`] | Dynamic callable lookup |

/// Value codec port
pub mod codec;
/// Remote store port
pub mod remote_store;
/// Resolver port
pub mod resolver;

pub use codec::ValueCodec;
pub use remote_store::{NoRemoteStore, RemoteStore, RemoteStoreFactory};
pub use resolver::{
    Callable, Component, ConstructorParameters, FunctionHandle, ResolveRequest, Resolver,
};
