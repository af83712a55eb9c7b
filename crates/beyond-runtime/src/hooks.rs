//! Callbacks from the realtime session into the application.

use beyond_core::BeyondUser;

use crate::classify::Notice;

/// Application state the session drives.
///
/// Called from the socket task; implementations must not block.
pub trait AppHooks: Send + Sync {
    /// A newer user record arrived.
    fn update_user(&self, user: &BeyondUser);

    /// The server assigned a new display name.
    fn set_display_name(&self, name: &str);

    /// Result of a username check; `error` is empty when available.
    fn set_username_availability(&self, available: bool, error: &str);

    /// Show a toast.
    fn notify(&self, notice: Notice);

    /// End the local session.
    fn logout(&self);
}
