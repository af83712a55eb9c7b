//! Realtime wire protocol shared by the launcher and the server.
//!
//! Every frame is a JSON [`Envelope`] `{type, data, timestamp, version}`.
//! `type` is drawn from the closed [`EventKind`] vocabulary and determines
//! the shape of `data`; [`SocketEvent`] is the tagged union that pairs each
//! kind with its typed payload.

mod envelope;
mod errors;
mod event;
mod kind;
mod payloads;

pub use envelope::{now_ms, Envelope};
pub use errors::ProtocolError;
pub use event::SocketEvent;
pub use kind::{EventKind, ALL_EVENT_KINDS};
pub use payloads::*;
