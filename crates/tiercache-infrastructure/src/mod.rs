// Clippy allows for complex patterns in infrastructure code
#![allow(clippy::collapsible_if)]

//! # Infrastructure Layer
//!
//! The hybrid cache itself and the technical concerns around it.
//!
//! ## Module Categories
//!
//! ### Caching
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Hybrid engine, namespace registry, object cache, memoizers |
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based layered configuration |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |

pub mod cache;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;

pub use error_ext::ErrorContext;
