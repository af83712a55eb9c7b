//! Turn socket `error` payloads into user-facing notices.

use std::time::Duration;

use beyond_core::ErrorPayload;
use serde::Serialize;

/// How long a non-critical notice stays on screen.
pub const NOTICE_DURATION: Duration = Duration::from_secs(5);

/// Severity of a [`Notice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Red toast.
    Error,
    /// Yellow toast.
    Warning,
}

/// A toast the application should show.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Whether the session must be ended.
    pub should_logout: bool,
    /// Display time; `None` keeps the notice until dismissed.
    pub duration: Option<Duration>,
}

/// Classify an error payload. First matching rule wins.
pub fn classify(error: &ErrorPayload) -> Notice {
    let message = error.message.as_str();
    let has = |needles: &[&str]| needles.iter().any(|n| message.contains(n));

    let (level, title, text, should_logout) = if has(&[
        "session has expired",
        "Token expired",
        "token expired",
    ]) {
        (
            NoticeLevel::Error,
            "Session Expired",
            "Your session has expired. Please log in again.",
            true,
        )
    } else if has(&["account has been banned", "user is banned"]) {
        (
            NoticeLevel::Error,
            "Account Banned",
            "Your account has been banned. Please contact support.",
            true,
        )
    } else if has(&[
        "session has been terminated",
        "Token invalidated",
        "token invalidated",
    ]) {
        (
            NoticeLevel::Error,
            "Session Terminated",
            "Your session has been terminated. Please log in again.",
            true,
        )
    } else if has(&["Authentication failed", "Invalid token"]) {
        (
            NoticeLevel::Error,
            "Authentication Failed",
            "Your session is invalid. Please log in again.",
            true,
        )
    } else if has(&["Not authenticated"]) {
        (
            NoticeLevel::Error,
            "Authentication Required",
            "Please log in to continue.",
            false,
        )
    } else if has(&["Connection timeout", "Heartbeat timeout"]) {
        (
            NoticeLevel::Warning,
            "Connection Timeout",
            "Lost connection to server. Reconnecting...",
            false,
        )
    } else if has(&["Max reconnection attempts"]) {
        (
            NoticeLevel::Error,
            "Connection Failed",
            "Unable to connect to server. Please check your internet connection.",
            false,
        )
    } else if has(&["Invalid message format"])
        || error.error_type.as_deref() == Some("unknown_message")
    {
        (
            NoticeLevel::Warning,
            "Communication Error",
            "There was a problem communicating with the server.",
            false,
        )
    } else if has(&["Server communication problem"]) {
        (NoticeLevel::Warning, "Connection Error", message, false)
    } else {
        (NoticeLevel::Error, "Connection Error", message, false)
    };

    Notice {
        level,
        title: title.to_string(),
        message: text.to_string(),
        should_logout,
        duration: (!error.critical).then_some(NOTICE_DURATION),
    }
}
