//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` to match the JSON file
//! format. Each type implements [`Default`] with production default values and
//! is marked `#[serde(default)]` so partial JSON fills the rest from defaults.

mod app;
mod socket;

pub use app::*;
pub use socket::*;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type for the Beyond launcher.
///
/// Loaded from `~/.beyond/settings.json` with defaults applied for missing
/// fields. Environment variables can override specific values.
///
/// # JSON Format
///
/// ```json
/// {
///   "environment": "development",
///   "server": { "wsEndpoint": "ws://127.0.0.1:3011/ws" },
///   "socket": { "maxReconnectAttempts": 3 }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LauncherSettings {
    /// Deployment environment.
    pub environment: Environment,
    /// Backend endpoints.
    pub server: ServerSettings,
    /// Realtime socket tuning.
    pub socket: SocketSettings,
    /// Profile polling.
    pub profile_sync: ProfileSyncSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl LauncherSettings {
    /// Whether the launcher runs in development mode.
    #[must_use]
    pub fn is_dev(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Reject values no socket could be built from.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidValue`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.server.ws_endpoint.as_str();
        if !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://")) {
            return Err(SettingsError::InvalidValue(format!(
                "server.wsEndpoint must start with ws:// or wss://, got {endpoint:?}"
            )));
        }
        if self.socket.heartbeat_interval_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "socket.heartbeatIntervalMs must be positive".into(),
            ));
        }
        if self.socket.connect_timeout_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "socket.connectTimeoutMs must be positive".into(),
            ));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = LauncherSettings::default();
        assert_eq!(settings.environment, Environment::Production);
        assert!(!settings.is_dev());
        assert_eq!(settings.server.ws_endpoint, "ws://127.0.0.1:3011/ws");
        assert_eq!(settings.socket.max_reconnect_attempts, 5);
        assert_eq!(settings.socket.reconnect_delay_ms, 2000);
        assert_eq!(settings.socket.heartbeat_interval_ms, 30_000);
        assert_eq!(settings.socket.connect_timeout_ms, 10_000);
        assert_eq!(settings.profile_sync.interval_ms, 30_000);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: LauncherSettings =
            serde_json::from_str(r#"{"environment":"development","socket":{"reconnectDelayMs":50}}"#)
                .unwrap();
        assert!(settings.is_dev());
        assert_eq!(settings.socket.reconnect_delay_ms, 50);
        assert_eq!(settings.socket.max_reconnect_attempts, 5);
        assert_eq!(settings.server, ServerSettings::default());
    }

    #[test]
    fn defaults_validate() {
        assert!(LauncherSettings::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_http_endpoint() {
        let mut settings = LauncherSettings::default();
        settings.server.ws_endpoint = "http://127.0.0.1:3011/ws".into();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("server.wsEndpoint"));
    }

    #[test]
    fn validate_rejects_zero_heartbeat() {
        let mut settings = LauncherSettings::default();
        settings.socket.heartbeat_interval_ms = 0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidValue(_))
        ));
    }

    #[test]
    fn serialized_defaults_snapshot() {
        let json = serde_json::to_string_pretty(&LauncherSettings::default()).unwrap();
        insta::assert_snapshot!(json, @r#"
        {
          "environment": "production",
          "server": {
            "wsEndpoint": "ws://127.0.0.1:3011/ws"
          },
          "socket": {
            "maxReconnectAttempts": 5,
            "reconnectDelayMs": 2000,
            "heartbeatIntervalMs": 30000,
            "connectTimeoutMs": 10000
          },
          "profileSync": {
            "intervalMs": 30000
          },
          "logging": {
            "level": "info"
          }
        }
        "#);
    }
}
