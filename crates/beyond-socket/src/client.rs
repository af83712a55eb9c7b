//! Session client facade.

use beyond_core::{EventKind, SocketEvent};

use crate::config::SocketConfig;
use crate::dispatcher::{EventHandler, Subscription};
use crate::error::SocketError;
use crate::manager::{ConnectionManager, ConnectionState, RetrySchedule};
use crate::transport::ReadyState;

/// Application-facing handle to one realtime session.
///
/// Passes straight through to a [`ConnectionManager`]. `is_connected` reads
/// the live transport, never a cached flag.
#[derive(Clone, Debug)]
pub struct SessionClient {
    manager: ConnectionManager,
}

impl SessionClient {
    /// Create a client. Nothing connects until [`connect`](Self::connect).
    #[must_use]
    pub fn new(config: SocketConfig) -> Self {
        Self {
            manager: ConnectionManager::new(config),
        }
    }

    /// See [`ConnectionManager::connect`].
    ///
    /// # Errors
    ///
    /// Propagates the manager's connect failure.
    pub async fn connect(&self) -> Result<(), SocketError> {
        self.manager.connect().await
    }

    /// See [`ConnectionManager::disconnect`].
    pub fn disconnect(&self) {
        self.manager.disconnect();
    }

    /// Disconnect and drop every subscription.
    pub fn shutdown(&self) {
        self.manager.shutdown();
    }

    /// Send an event; `false` if the socket is not open.
    pub fn send(&self, event: &SocketEvent) -> bool {
        self.manager.send(event)
    }

    /// Subscribe to every event of `kind`.
    pub fn on(&self, kind: EventKind, handler: impl Into<EventHandler>) -> Subscription {
        self.manager.on(kind, handler)
    }

    /// Subscribe to the next event of `kind`.
    pub fn once(&self, kind: EventKind, handler: impl Into<EventHandler>) -> EventHandler {
        self.manager.once(kind, handler)
    }

    /// Remove a handler.
    pub fn off(&self, kind: EventKind, handler: &EventHandler) {
        self.manager.off(kind, handler);
    }

    /// Whether the live transport is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.manager.is_connected()
    }

    /// Ready state of the live transport.
    #[must_use]
    pub fn ready_state(&self) -> ReadyState {
        self.manager.ready_state()
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.manager.state()
    }

    /// The scheduled retry, if any.
    #[must_use]
    pub fn retry_schedule(&self) -> Option<RetrySchedule> {
        self.manager.retry_schedule()
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &SocketConfig {
        self.manager.config()
    }

    /// The underlying manager.
    #[must_use]
    pub fn manager(&self) -> &ConnectionManager {
        &self.manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_client_is_not_connected() {
        let client = SessionClient::new(SocketConfig::new("ws://h/ws", "1.0").unwrap());
        assert!(!client.is_connected());
        assert_eq!(client.ready_state(), ReadyState::Closed);
        assert_eq!(client.state(), ConnectionState::Idle);
        assert!(!client.send(&SocketEvent::RequestFriends));
    }

    #[test]
    fn clones_share_subscriptions() {
        let client = SessionClient::new(SocketConfig::new("ws://h/ws", "1.0").unwrap());
        let other = client.clone();
        let handler = client.once(EventKind::User, |_: &SocketEvent| {});
        assert_eq!(other.manager().dispatcher().listener_count(EventKind::User), 1);
        other.off(EventKind::User, &handler);
        assert_eq!(client.manager().dispatcher().listener_count(EventKind::User), 0);
    }
}
