//! Environment, server, profile sync and logging settings.

use serde::{Deserialize, Serialize};

/// Deployment environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development; non-critical socket errors are logged too.
    Development,
    /// Release build.
    #[default]
    Production,
}

impl Environment {
    /// Parse an environment name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

/// Backend endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Realtime WebSocket endpoint; the session token is appended as a query pair.
    pub ws_endpoint: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            ws_endpoint: "ws://127.0.0.1:3011/ws".to_string(),
        }
    }
}

/// Profile polling while authenticated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSyncSettings {
    /// Poll interval in milliseconds.
    pub interval_ms: u64,
}

impl Default for ProfileSyncSettings {
    fn default() -> Self {
        Self { interval_ms: 30_000 }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: beyond_core::logging::DEFAULT_LEVEL.to_string(),
        }
    }
}
