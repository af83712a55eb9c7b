//! Per-session socket configuration.

use std::time::Duration;

use beyond_core::backoff::ReconnectPolicy;
use url::Url;

use crate::error::SocketError;

/// Default interval between heartbeat frames.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
/// Default upper bound on one connection attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything one connection manager needs to reach the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SocketConfig {
    /// Final WebSocket URL, token query pair included.
    pub url: Url,
    /// Protocol version stamped on every outgoing frame.
    pub version: String,
    /// Session token, if any.
    pub token: Option<String>,
    /// Reconnect attempts and base delay.
    pub reconnect: ReconnectPolicy,
    /// Heartbeat send interval.
    pub heartbeat_interval: Duration,
    /// Upper bound on one connection attempt.
    pub connect_timeout: Duration,
}

impl SocketConfig {
    /// Build a config for an already complete URL.
    ///
    /// # Errors
    ///
    /// Returns [`SocketError::InvalidUrl`] if `url` does not parse or is not
    /// a `ws`/`wss` URL.
    pub fn new(url: &str, version: impl Into<String>) -> Result<Self, SocketError> {
        let url = parse_ws_url(url)?;
        Ok(Self {
            url,
            version: version.into(),
            token: None,
            reconnect: ReconnectPolicy::default(),
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        })
    }

    /// Build a config from an endpoint and a session token.
    ///
    /// The token is appended as a percent-encoded `token` query pair.
    ///
    /// # Errors
    ///
    /// Returns [`SocketError::InvalidUrl`] if `endpoint` is not a WebSocket URL.
    pub fn for_endpoint(
        endpoint: &str,
        token: &str,
        version: impl Into<String>,
    ) -> Result<Self, SocketError> {
        let mut config = Self::new(endpoint, version)?;
        let _ = config.url.query_pairs_mut().append_pair("token", token);
        config.token = Some(token.to_string());
        Ok(config)
    }

    /// Override the reconnect policy.
    #[must_use]
    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    /// Override the heartbeat interval.
    #[must_use]
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Override the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// The URL without its query, safe to log.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let mut url = self.url.clone();
        url.set_query(None);
        url.to_string()
    }
}

fn parse_ws_url(raw: &str) -> Result<Url, SocketError> {
    let url = Url::parse(raw).map_err(|e| SocketError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(SocketError::InvalidUrl(format!(
            "{raw}: unsupported scheme {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn defaults() {
        let config = SocketConfig::new("ws://h/ws", "1.0").unwrap();
        assert_eq!(config.reconnect.max_attempts, 5);
        assert_eq!(config.reconnect.base_delay_ms, 2000);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.token.is_none());
    }

    #[test]
    fn token_is_query_encoded() {
        let config = SocketConfig::for_endpoint("ws://127.0.0.1:3011/ws", "a b&c", "1.0").unwrap();
        assert_eq!(config.url.as_str(), "ws://127.0.0.1:3011/ws?token=a+b%26c");
        assert_eq!(config.token.as_deref(), Some("a b&c"));
    }

    #[test]
    fn redacted_url_drops_token() {
        let config = SocketConfig::for_endpoint("ws://h/ws", "secret", "1.0").unwrap();
        assert_eq!(config.redacted_url(), "ws://h/ws");
    }

    #[test]
    fn rejects_non_websocket_scheme() {
        assert_matches!(
            SocketConfig::new("http://h/ws", "1.0"),
            Err(SocketError::InvalidUrl(msg)) if msg.contains("unsupported scheme http")
        );
        assert_matches!(
            SocketConfig::new("not a url", "1.0"),
            Err(SocketError::InvalidUrl(_))
        );
    }

    #[test]
    fn equal_inputs_give_equal_configs() {
        let a = SocketConfig::for_endpoint("ws://h/ws", "t", "1.0").unwrap();
        let b = SocketConfig::for_endpoint("ws://h/ws", "t", "1.0").unwrap();
        assert_eq!(a, b);
        let c = b.clone().with_heartbeat_interval(Duration::from_secs(1));
        assert_ne!(a, c);
    }
}
