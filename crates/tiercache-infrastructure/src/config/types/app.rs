//! Main application configuration

use super::cache::CacheSystemConfig;
use super::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Cache system configuration
    pub cache: CacheSystemConfig,
}
