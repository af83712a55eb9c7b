//! # beyond-core
//!
//! Foundation types shared by every Beyond launcher crate.
//!
//! - **Wire vocabulary**: [`EventKind`] names and the [`SocketEvent`] tagged union
//!   with one strongly-typed payload per kind
//! - **Envelope codec**: [`Envelope`] decoding/encoding of `{type, data, timestamp, version}`
//! - **Backoff**: linear reconnect delay calculation
//! - **Logging**: [`logging::init_subscriber`] for the `tracing` stderr subscriber

#![deny(unsafe_code)]

pub mod backoff;
pub mod constants;
pub mod logging;
pub mod protocol;

pub use protocol::{
    BeyondUser, CloseInfo, Envelope, ErrorPayload, EventKind, ProtocolError, SocketEvent,
    ALL_EVENT_KINDS,
};
