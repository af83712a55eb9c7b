//! Realtime socket tuning.

use std::time::Duration;

use beyond_core::backoff::{
    DEFAULT_MAX_RECONNECT_ATTEMPTS, DEFAULT_RECONNECT_DELAY_MS, ReconnectPolicy,
};
use serde::{Deserialize, Serialize};

/// Reconnect, heartbeat and connect-timeout parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocketSettings {
    /// Maximum automatic reconnect attempts.
    pub max_reconnect_attempts: u32,
    /// Base reconnect delay; attempt `n` waits `n × base`.
    pub reconnect_delay_ms: u64,
    /// Heartbeat send interval.
    pub heartbeat_interval_ms: u64,
    /// Upper bound on one connection attempt.
    pub connect_timeout_ms: u64,
}

impl Default for SocketSettings {
    fn default() -> Self {
        Self {
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
            heartbeat_interval_ms: 30_000,
            connect_timeout_ms: 10_000,
        }
    }
}

impl SocketSettings {
    /// The reconnect policy these settings describe.
    #[must_use]
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            max_attempts: self.max_reconnect_attempts,
            base_delay_ms: self.reconnect_delay_ms,
        }
    }

    /// Heartbeat interval as a [`Duration`].
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    /// Connect timeout as a [`Duration`].
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_mirrors_settings() {
        let settings = SocketSettings {
            max_reconnect_attempts: 2,
            reconnect_delay_ms: 100,
            ..SocketSettings::default()
        };
        let policy = settings.reconnect_policy();
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
    }

    #[test]
    fn durations() {
        let settings = SocketSettings::default();
        assert_eq!(settings.heartbeat_interval(), Duration::from_secs(30));
        assert_eq!(settings.connect_timeout(), Duration::from_secs(10));
    }
}
