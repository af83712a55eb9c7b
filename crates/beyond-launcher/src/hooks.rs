//! [`AppHooks`] that write everything to the log.

use beyond_core::BeyondUser;
use beyond_runtime::{AppHooks, Notice, NoticeLevel};
use tracing::{error, info, warn};

/// Headless stand-in for the launcher UI.
#[derive(Debug, Default)]
pub struct LoggingHooks;

impl AppHooks for LoggingHooks {
    fn update_user(&self, user: &BeyondUser) {
        let name = user
            .user_account
            .as_ref()
            .map_or("", |account| account.display_name.as_str());
        info!(id = %user.id, display_name = name, "user updated");
    }

    fn set_display_name(&self, name: &str) {
        info!(display_name = name, "display name set");
    }

    fn set_username_availability(&self, available: bool, error: &str) {
        info!(available, error, "username availability");
    }

    fn notify(&self, notice: Notice) {
        let duration_ms = notice.duration.map(|d| d.as_millis());
        match notice.level {
            NoticeLevel::Error => {
                error!(title = %notice.title, duration_ms = ?duration_ms, "{}", notice.message);
            }
            NoticeLevel::Warning => {
                warn!(title = %notice.title, duration_ms = ?duration_ms, "{}", notice.message);
            }
        }
    }

    fn logout(&self) {
        warn!("session ended by server; log in again to reconnect");
    }
}
