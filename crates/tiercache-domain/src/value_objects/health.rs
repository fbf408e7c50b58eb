//! Remote tier health
//!
//! The engine drives these transitions from its own operation outcomes:
//!
//! ```text
//! Unknown --ping ok--> Available --any error--> Degraded
//!    |                                            |
//!    +--ping error--> Degraded <--probe error-----+
//!                        |
//!                        +--probe ok (after reprobe interval)--> Available
//! ```
//!
//! `Disabled` is terminal and means no remote tier is configured.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Health of a namespace's remote tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteHealth {
    /// No remote tier configured for the namespace
    Disabled,
    /// Configured but not probed yet
    Unknown,
    /// Last probe or operation succeeded
    Available,
    /// Last probe or operation failed
    Degraded,
}

impl RemoteHealth {
    /// Whether operations should be routed to the remote tier
    pub fn is_available(self) -> bool {
        self == Self::Available
    }

    /// State after an operation or probe succeeded
    pub fn on_success(self) -> Self {
        match self {
            Self::Disabled => Self::Disabled,
            _ => Self::Available,
        }
    }

    /// State after an operation or probe failed
    pub fn on_failure(self) -> Self {
        match self {
            Self::Disabled => Self::Disabled,
            _ => Self::Degraded,
        }
    }
}

impl fmt::Display for RemoteHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disabled => "disabled",
            Self::Unknown => "unknown",
            Self::Available => "available",
            Self::Degraded => "degraded",
        };
        f.write_str(name)
    }
}
