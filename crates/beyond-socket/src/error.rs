//! Socket error types.

/// Errors surfaced by [`crate::ConnectionManager::connect`] and friends.
///
/// `Clone` so a single pending connect outcome can be handed to every caller
/// that joined it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SocketError {
    /// The endpoint could not be turned into a WebSocket URL.
    #[error("invalid websocket url: {0}")]
    InvalidUrl(String),

    /// The handshake or TCP connect failed.
    #[error("WebSocket connection failed: {0}")]
    ConnectionFailed(String),

    /// No handshake completed within the connect timeout.
    #[error("connection timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// `disconnect()` was called while the attempt was pending.
    #[error("disconnected before the connection opened")]
    Disconnected,

    /// The manager was dropped or has no transport.
    #[error("socket not initialized")]
    NotInitialized,
}
