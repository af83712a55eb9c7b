//! Connection status shown by the application shell.

use serde::Serialize;

/// Snapshot of the session's connection state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    /// The socket is open.
    pub is_connected: bool,
    /// A connect call is in flight.
    pub is_connecting: bool,
    /// Last error message, cleared on connect.
    pub connection_error: Option<String>,
}

impl ConnectionStatus {
    pub(crate) fn connecting(&mut self) {
        self.is_connecting = true;
        self.connection_error = None;
    }

    pub(crate) fn connected(&mut self) {
        self.is_connected = true;
        self.is_connecting = false;
        self.connection_error = None;
    }

    pub(crate) fn disconnected(&mut self) {
        self.is_connected = false;
        self.is_connecting = false;
    }

    pub(crate) fn failed(&mut self, message: impl Into<String>) {
        self.is_connecting = false;
        self.connection_error = Some(message.into());
    }
}
