//! One physical WebSocket connection.
//!
//! [`Transport::open`] spawns a single task that owns the socket. The task
//! connects (bounded by the connect timeout), then multiplexes heartbeat
//! ticks, outgoing frames and incoming frames until the socket closes or the
//! transport is closed/dropped. Everything it observes is reported as a
//! [`TransportEvent`] on the caller's channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use beyond_core::constants::{CLOSE_ABNORMAL, CLOSE_NORMAL};
use beyond_core::protocol::now_ms;
use beyond_core::{CloseInfo, Envelope, SocketEvent};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::SocketConfig;
use crate::error::SocketError;

// ─── Ready state ─────────────────────────────────────────────────────────────

/// Socket ready state, numbered like the browser `WebSocket.readyState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ReadyState {
    /// Handshake in progress.
    Connecting = 0,
    /// Frames can be sent.
    Open = 1,
    /// Close requested or received.
    Closing = 2,
    /// Gone.
    Closed = 3,
}

impl ReadyState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Connecting,
            1 => Self::Open,
            2 => Self::Closing,
            _ => Self::Closed,
        }
    }

    /// Numeric value (0–3).
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Debug)]
struct SharedState(AtomicU8);

impl SharedState {
    fn new() -> Self {
        Self(AtomicU8::new(ReadyState::Connecting.as_u8()))
    }

    fn get(&self) -> ReadyState {
        ReadyState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, state: ReadyState) {
        self.0.store(state.as_u8(), Ordering::Release);
    }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// What the connection task reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed.
    Opened,
    /// One inbound text frame.
    Message(String),
    /// The open socket hit an I/O or protocol error; `Closed` follows.
    Error(String),
    /// The socket never opened. No `Closed` follows.
    Failed(SocketError),
    /// The open socket closed.
    Closed(CloseInfo),
}

// ─── Transport ───────────────────────────────────────────────────────────────

/// Handle to one connection task.
///
/// Dropping the handle cancels the task; an open socket gets a normal
/// close frame on the way out.
#[derive(Debug)]
pub struct Transport {
    state: Arc<SharedState>,
    outgoing: mpsc::UnboundedSender<Message>,
    cancel: CancellationToken,
    version: String,
}

impl Transport {
    /// Start connecting to `config.url`; events go to `events`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(config: &SocketConfig, events: mpsc::UnboundedSender<TransportEvent>) -> Self {
        let state = Arc::new(SharedState::new());
        let cancel = CancellationToken::new();
        let (outgoing, outgoing_rx) = mpsc::unbounded_channel();

        let task = ConnectionTask {
            url: config.url.to_string(),
            log_url: config.redacted_url(),
            version: config.version.clone(),
            heartbeat_interval: config.heartbeat_interval,
            connect_timeout: config.connect_timeout,
            state: Arc::clone(&state),
            outgoing: outgoing_rx,
            events,
            cancel: cancel.clone(),
        };
        let _ = tokio::spawn(task.run());

        Self {
            state,
            outgoing,
            cancel,
            version: config.version.clone(),
        }
    }

    /// Current ready state.
    #[must_use]
    pub fn ready_state(&self) -> ReadyState {
        self.state.get()
    }

    /// Whether frames can be sent right now.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.ready_state() == ReadyState::Open
    }

    /// Stamp `event` with timestamp and version and queue it for sending.
    ///
    /// Returns `false` without sending anything if the socket is not open or
    /// the frame cannot be encoded or queued. Never panics.
    pub fn safe_send(&self, event: &SocketEvent) -> bool {
        if !self.is_open() {
            debug!(kind = %event.kind(), state = ?self.ready_state(), "send skipped, socket not open");
            return false;
        }
        let text = match Envelope::encode(event, &self.version, now_ms()) {
            Ok(text) => text,
            Err(e) => {
                warn!(kind = %event.kind(), error = %e, "failed to encode outgoing frame");
                return false;
            }
        };
        if self.outgoing.send(Message::Text(text.into())).is_err() {
            warn!(kind = %event.kind(), "connection task gone, frame dropped");
            return false;
        }
        trace!(kind = %event.kind(), "frame queued");
        true
    }

    /// Close with code 1000. Idempotent.
    pub fn close(&self) {
        if self.ready_state() != ReadyState::Closed {
            self.state.set(ReadyState::Closing);
        }
        self.cancel.cancel();
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ─── Connection task ─────────────────────────────────────────────────────────

struct ConnectionTask {
    url: String,
    log_url: String,
    version: String,
    heartbeat_interval: Duration,
    connect_timeout: Duration,
    state: Arc<SharedState>,
    outgoing: mpsc::UnboundedReceiver<Message>,
    events: mpsc::UnboundedSender<TransportEvent>,
    cancel: CancellationToken,
}

impl ConnectionTask {
    async fn run(mut self) {
        let connect = tokio::time::timeout(self.connect_timeout, connect_async(self.url.as_str()));
        let ws = tokio::select! {
            () = self.cancel.cancelled() => {
                self.state.set(ReadyState::Closed);
                debug!(url = %self.log_url, "connect cancelled");
                return;
            }
            result = connect => match result {
                Ok(Ok((ws, _response))) => ws,
                Ok(Err(e)) => {
                    self.fail(SocketError::ConnectionFailed(e.to_string()));
                    return;
                }
                Err(_) => {
                    let timeout_ms = u64::try_from(self.connect_timeout.as_millis()).unwrap_or(u64::MAX);
                    self.fail(SocketError::Timeout { timeout_ms });
                    return;
                }
            },
        };

        self.state.set(ReadyState::Open);
        debug!(url = %self.log_url, "socket open");
        self.report(TransportEvent::Opened);

        let (mut sink, mut stream) = ws.split();
        let mut heartbeat =
            tokio::time::interval_at(Instant::now() + self.heartbeat_interval, self.heartbeat_interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let close = loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    let frame = CloseFrame {
                        code: CloseCode::Normal,
                        reason: "".into(),
                    };
                    if let Err(e) = sink.send(Message::Close(Some(frame))).await {
                        debug!(error = %e, "close frame not delivered");
                    }
                    break CloseInfo::new(CLOSE_NORMAL, "");
                }
                _ = heartbeat.tick() => {
                    if self.state.get() != ReadyState::Open {
                        continue;
                    }
                    match Envelope::encode(&SocketEvent::Heartbeat, &self.version, now_ms()) {
                        Ok(text) => {
                            if let Err(e) = sink.send(Message::Text(text.into())).await {
                                warn!(error = %e, "heartbeat send failed");
                            } else {
                                trace!("heartbeat sent");
                            }
                        }
                        Err(e) => warn!(error = %e, "failed to encode heartbeat"),
                    }
                }
                Some(message) = self.outgoing.recv() => {
                    if let Err(e) = sink.send(message).await {
                        warn!(error = %e, "outgoing frame send failed");
                    }
                }
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        self.report(TransportEvent::Message(text.as_str().to_owned()));
                    }
                    Some(Ok(Message::Close(frame))) => {
                        self.state.set(ReadyState::Closing);
                        let info = frame.map_or_else(
                            || CloseInfo::new(CLOSE_NORMAL, ""),
                            |f| CloseInfo::new(u16::from(f.code), f.reason.as_str()),
                        );
                        debug!(code = info.code, reason = %info.reason, "close frame received");
                        // Writes the queued close reply.
                        if let Err(e) = sink.close().await {
                            debug!(error = %e, "close reply not delivered");
                        }
                        break info;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "socket error");
                        self.report(TransportEvent::Error(e.to_string()));
                        break CloseInfo::new(CLOSE_ABNORMAL, "");
                    }
                    None => break CloseInfo::new(CLOSE_ABNORMAL, ""),
                },
            }
        };

        self.state.set(ReadyState::Closed);
        debug!(url = %self.log_url, code = close.code, "socket closed");
        self.report(TransportEvent::Closed(close));
    }

    fn fail(&self, error: SocketError) {
        self.state.set(ReadyState::Closed);
        debug!(url = %self.log_url, error = %error, "socket failed to open");
        self.report(TransportEvent::Failed(error));
    }

    fn report(&self, event: TransportEvent) {
        // The receiver is gone once the owner has moved on.
        let _ = self.events.send(event);
    }
}
