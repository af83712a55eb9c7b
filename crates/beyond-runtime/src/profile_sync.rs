//! Periodic profile refresh and user-record deduplication.

use std::time::Duration;

use beyond_core::{BeyondUser, SocketEvent};
use beyond_socket::SessionClient;
use parking_lot::Mutex;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Polls the server for the user record and profile while running.
#[derive(Debug)]
pub struct ProfileSync {
    client: SessionClient,
    interval: Duration,
    cancel: Mutex<Option<CancellationToken>>,
}

impl ProfileSync {
    /// Create a stopped poller.
    pub fn new(client: SessionClient, interval: Duration) -> Self {
        Self {
            client,
            interval,
            cancel: Mutex::new(None),
        }
    }

    /// Request both records now, then again every interval.
    ///
    /// Restarting replaces the running poll. Must be called inside a Tokio
    /// runtime.
    pub fn start(&self) {
        let token = CancellationToken::new();
        if let Some(previous) = self.cancel.lock().replace(token.clone()) {
            previous.cancel();
        }

        let client = self.client.clone();
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let _ = tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {
                        debug!("requesting user data update");
                        let _ = client.send(&SocketEvent::RequestUser);
                        let _ = client.send(&SocketEvent::RequestProfileUpdate);
                    }
                }
            }
        });
    }

    /// Stop polling. No-op when stopped.
    pub fn stop(&self) {
        if let Some(token) = self.cancel.lock().take() {
            token.cancel();
        }
    }

    /// Whether a poll is running.
    pub fn is_running(&self) -> bool {
        self.cancel.lock().is_some()
    }
}

impl Drop for ProfileSync {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Remembers the last user record handed to the application.
#[derive(Debug, Default)]
pub struct UserCache {
    last: Mutex<Option<String>>,
}

impl UserCache {
    /// Whether `user` should be forwarded.
    ///
    /// Records without a `UserAccount` are partial and never forwarded.
    /// Otherwise the record is remembered and `true` is returned when its
    /// JSON differs from the last forwarded one.
    pub fn accept(&self, user: &BeyondUser) -> bool {
        if user.user_account.is_none() {
            debug!(id = %user.id, "ignoring user record without account");
            return false;
        }
        let serialized = match serde_json::to_string(user) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "failed to serialize user record");
                return false;
            }
        };
        let mut last = self.last.lock();
        if last.as_deref() == Some(serialized.as_str()) {
            return false;
        }
        *last = Some(serialized);
        true
    }

    /// Forget the last record.
    pub fn reset(&self) {
        *self.last.lock() = None;
    }
}
