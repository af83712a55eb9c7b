//! # beyond-socket
//!
//! Realtime WebSocket session layer for the Beyond launcher.
//!
//! - [`transport`]: one physical socket with heartbeat and non-failing sends
//! - [`dispatcher`]: per-kind persistent and one-shot handler registry
//! - [`manager`]: reconnect state machine with linear backoff
//! - [`client`]: the [`SessionClient`] facade applications hold

#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod manager;
pub mod transport;

pub use client::SessionClient;
pub use config::SocketConfig;
pub use dispatcher::{EventDispatcher, EventHandler, Subscription};
pub use error::SocketError;
pub use manager::{ConnectionManager, ConnectionState, RetrySchedule};
pub use transport::{ReadyState, Transport, TransportEvent};
