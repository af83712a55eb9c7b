//! Connection manager: owns the transport, the reconnect state machine and
//! the dispatcher.
//!
//! ```text
//! Idle ──connect()──▶ Connecting ──opened──▶ Open ──closed──▶ Closed
//!   ▲                     │                                    │
//!   │                   failed                          retry scheduled
//!   │                     ▼                                    ▼
//!   └──max attempts── Reconnecting ◀──────────────────── Reconnecting
//! ```
//!
//! Each transport is tagged with a generation. Events from a transport that
//! has been replaced or discarded are ignored, so nothing a killed socket
//! reports can reach handlers or schedule a retry.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Weak};
use std::time::Duration;

use beyond_core::constants::{CLOSE_NORMAL, INTENTIONAL_DISCONNECT_REASON};
use beyond_core::{CloseInfo, Envelope, EventKind, SocketEvent};
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::SocketConfig;
use crate::dispatcher::{EventDispatcher, EventHandler, Subscription};
use crate::error::SocketError;
use crate::transport::{ReadyState, Transport, TransportEvent};

/// Message of the error emitted when an open socket reports an error.
pub const SOCKET_ERROR_MESSAGE: &str = "WebSocket error occurred";
/// Message of the error emitted for an unreadable inbound frame.
pub const PARSE_ERROR_MESSAGE: &str = "Failed to parse message";
/// Message of the error emitted when retries are exhausted.
pub const MAX_ATTEMPTS_MESSAGE: &str = "Max reconnection attempts reached";
/// Fallback message for a 1008 close without a reason.
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed";

// ─── State ───────────────────────────────────────────────────────────────────

/// Lifecycle state of a [`ConnectionManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Never connected, or retries exhausted.
    Idle,
    /// An attempt is in flight.
    Connecting,
    /// The socket is open.
    Open,
    /// The server sent a close frame that has not been processed yet.
    Closing,
    /// The socket closed and no retry is pending.
    Closed,
    /// A retry timer is running.
    Reconnecting,
}

/// The next automatic attempt, when one is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetrySchedule {
    /// 1-based attempt number.
    pub attempt: u32,
    /// Delay chosen for this attempt.
    pub delay: Duration,
    /// When the attempt starts.
    pub due_at: Instant,
}

type ConnectOutcome = Option<Result<(), SocketError>>;

struct ScheduledRetry {
    id: u64,
    schedule: RetrySchedule,
    task: JoinHandle<()>,
}

struct State {
    connection: ConnectionState,
    attempts: u32,
    intentional: bool,
    transport: Option<Transport>,
    generation: u64,
    pending: Option<watch::Sender<ConnectOutcome>>,
    retry: Option<ScheduledRetry>,
    next_retry_id: u64,
}

impl State {
    fn new() -> Self {
        Self {
            connection: ConnectionState::Idle,
            attempts: 0,
            intentional: false,
            transport: None,
            generation: 0,
            pending: None,
            retry: None,
            next_retry_id: 0,
        }
    }

    fn cancel_retry(&mut self) {
        if let Some(retry) = self.retry.take() {
            retry.task.abort();
        }
    }
}

impl Drop for State {
    fn drop(&mut self) {
        self.cancel_retry();
    }
}

struct Inner {
    config: SocketConfig,
    dispatcher: EventDispatcher,
    state: Mutex<State>,
}

// ─── Manager ─────────────────────────────────────────────────────────────────

/// Reconnecting connection manager.
///
/// Cheap to clone; clones drive the same connection. Dropping the last clone
/// closes the socket and stops any scheduled retry.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("url", &self.inner.config.redacted_url())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl ConnectionManager {
    /// Create an idle manager. Nothing connects until [`connect`](Self::connect).
    #[must_use]
    pub fn new(config: SocketConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                dispatcher: EventDispatcher::new(),
                state: Mutex::new(State::new()),
            }),
        }
    }

    /// The configuration this manager connects with.
    #[must_use]
    pub fn config(&self) -> &SocketConfig {
        &self.inner.config
    }

    /// The dispatcher events are emitted on.
    #[must_use]
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.inner.dispatcher
    }

    /// Whether both handles drive the same connection.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Connect, or join the attempt already in flight.
    ///
    /// Resolves immediately when already open. An explicit call while a retry
    /// is scheduled cancels the timer and connects now.
    ///
    /// # Errors
    ///
    /// Returns the attempt's failure ([`SocketError::ConnectionFailed`],
    /// [`SocketError::Timeout`]) after the `error` event has been emitted, or
    /// [`SocketError::Disconnected`] if [`disconnect`](Self::disconnect) ran
    /// first.
    pub async fn connect(&self) -> Result<(), SocketError> {
        let mut outcome = {
            let mut state = self.inner.state.lock();
            if state.transport.as_ref().is_some_and(Transport::is_open) {
                return Ok(());
            }
            let joined = state.pending.as_ref().map(watch::Sender::subscribe);
            match joined {
                Some(outcome) => {
                    debug!("joining pending connect");
                    outcome
                }
                None => {
                    state.intentional = false;
                    state.cancel_retry();
                    self.inner.start_attempt(&mut state)
                }
            }
        };
        let result = outcome
            .wait_for(Option::is_some)
            .await
            .map(|value| (*value).clone());
        match result {
            Ok(Some(result)) => result,
            Ok(None) | Err(_) => Err(SocketError::NotInitialized),
        }
    }

    /// Close the socket on purpose.
    ///
    /// Cancels any scheduled retry, rejects a pending connect with
    /// [`SocketError::Disconnected`], and emits `disconnected` with code 1000
    /// before returning. Later reports from the old socket are ignored.
    pub fn disconnect(&self) {
        let (pending, transport) = {
            let mut state = self.inner.state.lock();
            state.intentional = true;
            state.attempts = 0;
            state.cancel_retry();
            state.generation += 1;
            state.connection = ConnectionState::Closed;
            (state.pending.take(), state.transport.take())
        };
        if let Some(transport) = transport {
            transport.close();
        }
        if let Some(pending) = pending {
            let _ = pending.send_replace(Some(Err(SocketError::Disconnected)));
        }
        info!(url = %self.inner.config.redacted_url(), "socket disconnected");
        self.inner.emit(&SocketEvent::Disconnected(CloseInfo::new(
            CLOSE_NORMAL,
            INTENTIONAL_DISCONNECT_REASON,
        )));
    }

    /// [`disconnect`](Self::disconnect), then drop every subscription.
    pub fn shutdown(&self) {
        self.disconnect();
        self.inner.dispatcher.clear();
    }

    /// Send an event stamped with timestamp and version.
    ///
    /// Returns `false` if the socket is not open.
    pub fn send(&self, event: &SocketEvent) -> bool {
        let state = self.inner.state.lock();
        state.transport.as_ref().is_some_and(|t| t.safe_send(event))
    }

    /// Subscribe to every event of `kind`.
    pub fn on(&self, kind: EventKind, handler: impl Into<EventHandler>) -> Subscription {
        self.inner.dispatcher.on(kind, handler)
    }

    /// Subscribe to the next event of `kind`.
    pub fn once(&self, kind: EventKind, handler: impl Into<EventHandler>) -> EventHandler {
        self.inner.dispatcher.once(kind, handler)
    }

    /// Remove a handler registered with `on` or `once`.
    pub fn off(&self, kind: EventKind, handler: &EventHandler) {
        self.inner.dispatcher.off(kind, handler);
    }

    /// Whether the live transport is open right now.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.ready_state() == ReadyState::Open
    }

    /// Ready state of the live transport, `Closed` when there is none.
    #[must_use]
    pub fn ready_state(&self) -> ReadyState {
        let state = self.inner.state.lock();
        state
            .transport
            .as_ref()
            .map_or(ReadyState::Closed, Transport::ready_state)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        let state = self.inner.state.lock();
        match (state.connection, state.transport.as_ref().map(Transport::ready_state)) {
            (ConnectionState::Open, Some(ReadyState::Closing)) => ConnectionState::Closing,
            (connection, _) => connection,
        }
    }

    /// Automatic attempts made since the last successful open.
    #[must_use]
    pub fn reconnect_attempts(&self) -> u32 {
        self.inner.state.lock().attempts
    }

    /// The scheduled retry, if any.
    #[must_use]
    pub fn retry_schedule(&self) -> Option<RetrySchedule> {
        self.inner.state.lock().retry.as_ref().map(|r| r.schedule)
    }
}

// ─── Internals ───────────────────────────────────────────────────────────────

impl Inner {
    /// Replace the transport with a fresh one. Caller holds the state lock.
    fn start_attempt(self: &Arc<Self>, state: &mut State) -> watch::Receiver<ConnectOutcome> {
        state.generation += 1;
        let generation = state.generation;
        if let Some(old) = state.transport.take() {
            old.close();
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        state.transport = Some(Transport::open(&self.config, events_tx));
        state.connection = ConnectionState::Connecting;

        let (outcome_tx, outcome_rx) = watch::channel(None);
        state.pending = Some(outcome_tx);

        debug!(url = %self.config.redacted_url(), generation, "connecting");
        let _ = tokio::spawn(pump(Arc::downgrade(self), generation, events_rx));
        outcome_rx
    }

    /// Handle one transport report. Returns `false` once the generation is stale.
    fn on_transport_event(self: &Arc<Self>, generation: u64, event: TransportEvent) -> bool {
        match event {
            TransportEvent::Opened => {
                let pending = {
                    let mut state = self.state.lock();
                    if state.generation != generation {
                        return false;
                    }
                    state.connection = ConnectionState::Open;
                    state.attempts = 0;
                    state.cancel_retry();
                    state.pending.take()
                };
                info!(url = %self.config.redacted_url(), "socket connected");
                self.emit(&SocketEvent::Connected);
                if let Some(pending) = pending {
                    let _ = pending.send_replace(Some(Ok(())));
                }
            }
            TransportEvent::Failed(err) => {
                let (pending, follow_up) = {
                    let mut state = self.state.lock();
                    if state.generation != generation {
                        return false;
                    }
                    state.connection = ConnectionState::Closed;
                    state.transport = None;
                    let pending = state.pending.take();
                    (pending, self.schedule_retry(&mut state))
                };
                error!(url = %self.config.redacted_url(), error = %err, "socket connection failed");
                self.emit(&SocketEvent::critical_error(err.to_string()));
                if let Some(event) = follow_up {
                    self.emit(&event);
                }
                if let Some(pending) = pending {
                    let _ = pending.send_replace(Some(Err(err)));
                }
                return false;
            }
            TransportEvent::Error(reason) => {
                if !self.is_current(generation) {
                    return false;
                }
                error!(error = %reason, "socket error");
                self.emit(&SocketEvent::critical_error(SOCKET_ERROR_MESSAGE));
            }
            TransportEvent::Message(text) => {
                if !self.is_current(generation) {
                    return false;
                }
                self.on_message(&text);
            }
            TransportEvent::Closed(info) => {
                let follow_up = {
                    let mut state = self.state.lock();
                    if state.generation != generation {
                        return false;
                    }
                    state.connection = ConnectionState::Closed;
                    state.transport = None;
                    if info.is_auth_rejection() {
                        None
                    } else {
                        self.schedule_retry(&mut state)
                    }
                };
                info!(code = info.code, reason = %info.reason, "socket closed");
                let auth_rejected = info.is_auth_rejection();
                let reason = info.reason.clone();
                self.emit(&SocketEvent::Disconnected(info));
                if auth_rejected {
                    let message = if reason.is_empty() {
                        AUTH_FAILED_MESSAGE.to_string()
                    } else {
                        reason
                    };
                    error!(message = %message, "server rejected credentials, not retrying");
                    self.emit(&SocketEvent::critical_error(message));
                }
                if let Some(event) = follow_up {
                    self.emit(&event);
                }
                return false;
            }
        }
        true
    }

    fn on_message(&self, text: &str) {
        match Envelope::decode(text) {
            Ok(envelope) => {
                debug!(kind = %envelope.event.kind(), "message received");
                self.emit(&envelope.event);
            }
            Err(e) if e.is_parse_failure() => {
                warn!(error = %e, "failed to parse message");
                self.emit(&SocketEvent::warning(PARSE_ERROR_MESSAGE));
            }
            Err(e) => warn!(error = %e, "dropping message of unknown type"),
        }
    }

    /// Schedule the next retry, or give up. Caller holds the state lock.
    ///
    /// Returns an event to emit once the lock is released.
    fn schedule_retry(self: &Arc<Self>, state: &mut State) -> Option<SocketEvent> {
        if state.intentional {
            return None;
        }
        let policy = self.config.reconnect;
        if policy.is_exhausted(state.attempts) {
            state.connection = ConnectionState::Idle;
            error!(attempts = state.attempts, "max reconnection attempts reached");
            return Some(SocketEvent::critical_error(MAX_ATTEMPTS_MESSAGE));
        }

        state.attempts += 1;
        let attempt = state.attempts;
        let delay = policy.delay_for(attempt);
        state.next_retry_id += 1;
        let id = state.next_retry_id;

        let weak = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else { return };
            if !inner.claim_retry(id) {
                return;
            }
            debug!(attempt, "retry due");
            let manager = ConnectionManager { inner };
            // Failures were already reported through the dispatcher.
            let _ = manager.connect().await;
        });

        state.retry = Some(ScheduledRetry {
            id,
            schedule: RetrySchedule {
                attempt,
                delay,
                due_at: Instant::now() + delay,
            },
            task,
        });
        state.connection = ConnectionState::Reconnecting;
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        info!(attempt, max = policy.max_attempts, delay_ms, "reconnect scheduled");
        None
    }

    /// Take the scheduled retry if it is still `id`.
    fn claim_retry(&self, id: u64) -> bool {
        let mut state = self.state.lock();
        if state.retry.as_ref().is_some_and(|r| r.id == id) {
            state.retry = None;
            true
        } else {
            false
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.lock().generation == generation
    }

    /// Emit with each handler isolated; a panicking handler is logged and
    /// the rest still run.
    fn emit(&self, event: &SocketEvent) {
        self.dispatcher.emit_with(event, |handler, event| {
            if catch_unwind(AssertUnwindSafe(|| handler.call(event))).is_err() {
                error!(kind = %event.kind(), "event handler panicked");
            }
        });
    }
}

async fn pump(
    inner: Weak<Inner>,
    generation: u64,
    mut events: mpsc::UnboundedReceiver<TransportEvent>,
) {
    while let Some(event) = events.recv().await {
        let Some(inner) = inner.upgrade() else { break };
        if !inner.on_transport_event(generation, event) {
            break;
        }
    }
}
