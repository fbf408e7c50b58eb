//! # Tiercache Domain
//!
//! Core types for the tiered cache: the derived [`CacheKey`](value_objects::CacheKey),
//! the disk-resident [`CacheRecord`](value_objects::CacheRecord), the remote tier
//! health state machine, statistics, and the port traits implemented by the
//! providers crate.
//!
//! This crate performs no I/O.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Domain error type and `Result` alias |
//! | [`constants`] | Defaults shared by every layer |
//! | [`value_objects`] | Keys, records, health and stats |
//! | [`ports`] | `RemoteStore`, `ValueCodec` and `Resolver` contracts |

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
