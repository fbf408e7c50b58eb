//! Configuration types

pub mod app;
pub mod cache;
pub mod logging;

pub use app::AppConfig;
pub use cache::{CacheSystemConfig, DiskConfig, RemoteConfig, RemoteProvider};
pub use logging::LoggingConfig;
