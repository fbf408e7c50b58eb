//! Configuration management
//!
//! Layered loading through Figment: defaults, TOML file, legacy
//! environment variables, then `TIERCACHE__` prefixed variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{
    AppConfig, CacheSystemConfig, DiskConfig, LoggingConfig, RemoteConfig, RemoteProvider,
};
