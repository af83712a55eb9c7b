//! # beyond-runtime
//!
//! Ties the realtime session to application state.
//!
//! - [`gating`]: which screens and auth states get a socket
//! - [`runtime`]: [`LauncherRuntime`], which builds and tears down sessions
//! - [`profile_sync`]: periodic user/profile refresh with deduplication
//! - [`classify`]: maps socket errors to toasts and forced logouts
//! - [`hooks`]: the [`AppHooks`] callbacks the application implements

#![deny(unsafe_code)]

pub mod classify;
pub mod errors;
pub mod gating;
pub mod hooks;
pub mod profile_sync;
pub mod runtime;
mod session;
pub mod status;

pub use classify::{Notice, NoticeLevel, classify};
pub use errors::RuntimeError;
pub use gating::{SessionInputs, is_socket_disabled_route};
pub use hooks::AppHooks;
pub use runtime::LauncherRuntime;
pub use session::USERNAME_TAKEN_MESSAGE;
pub use status::ConnectionStatus;
