//! Event name vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every event name known to client and server.
///
/// Lifecycle kinds (`connected`, `disconnected`, `error`) are produced
/// locally by the connection manager; the rest travel over the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    // ── Lifecycle ────────────────────────────────────────────────────
    /// The socket opened.
    Connected,
    /// The socket closed (locally requested or reported by the transport).
    Disconnected,
    /// A connection, protocol or server error.
    Error,
    /// Keep-alive frame.
    Heartbeat,

    // ── Session / profile ────────────────────────────────────────────
    /// Full user record pushed by the server.
    User,
    /// The server confirmed a username change.
    NewUsername,
    /// Ask the server for the user record.
    RequestUser,
    /// The server accepted the connection's credentials.
    Authenticated,
    /// Onboarding finished.
    SetupComplete,
    /// Request a username change.
    SetNewUsername,
    /// Ask the server for a heartbeat.
    RequestHeartbeat,
    /// Ask the server for a profile refresh.
    RequestProfileUpdate,
    /// Profile refresh pushed by the server.
    ProfileUpdate,

    // ── Home feed ────────────────────────────────────────────────────
    /// Patch notes list pushed by the server.
    PatchNotesUpdate,
    /// Online player counters pushed by the server.
    PlayerCountUpdate,
    /// Mark one patch note as read.
    MarkPatchNoteRead,
    /// Ask the server for patch notes.
    RequestPatchNotes,
    /// Ask the server for player counters.
    RequestPlayerCount,
    /// News list pushed by the server.
    NewsUpdate,
    /// Ask the server for news.
    RequestNews,

    // ── Username availability ────────────────────────────────────────
    /// Ask whether a username is free.
    CheckUsername,
    /// Availability answer.
    UsernameAvailable,
    /// The requested username is taken.
    UsernameTaken,

    // ── Game launch / social ─────────────────────────────────────────
    /// Ask the server for a one-time exchange code.
    RequestExchangeCode,
    /// One-time exchange code.
    ExchangeCode,
    /// Ask the server for the friends list.
    RequestFriends,
    /// Friends list pushed by the server.
    FriendsList,
}

/// All event kinds, for exhaustive testing and lookups.
pub const ALL_EVENT_KINDS: &[EventKind] = &[
    EventKind::Connected,
    EventKind::Disconnected,
    EventKind::Error,
    EventKind::Heartbeat,
    EventKind::User,
    EventKind::NewUsername,
    EventKind::RequestUser,
    EventKind::Authenticated,
    EventKind::SetupComplete,
    EventKind::SetNewUsername,
    EventKind::RequestHeartbeat,
    EventKind::RequestProfileUpdate,
    EventKind::ProfileUpdate,
    EventKind::PatchNotesUpdate,
    EventKind::PlayerCountUpdate,
    EventKind::MarkPatchNoteRead,
    EventKind::RequestPatchNotes,
    EventKind::RequestPlayerCount,
    EventKind::NewsUpdate,
    EventKind::RequestNews,
    EventKind::CheckUsername,
    EventKind::UsernameAvailable,
    EventKind::UsernameTaken,
    EventKind::RequestExchangeCode,
    EventKind::ExchangeCode,
    EventKind::RequestFriends,
    EventKind::FriendsList,
];

impl EventKind {
    /// Wire name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Error => "error",
            Self::Heartbeat => "heartbeat",
            Self::User => "user",
            Self::NewUsername => "new_username",
            Self::RequestUser => "request_user",
            Self::Authenticated => "authenticated",
            Self::SetupComplete => "setup_complete",
            Self::SetNewUsername => "set_new_username",
            Self::RequestHeartbeat => "request_heartbeat",
            Self::RequestProfileUpdate => "request_profile_update",
            Self::ProfileUpdate => "profile_update",
            Self::PatchNotesUpdate => "patch_notes_update",
            Self::PlayerCountUpdate => "player_count_update",
            Self::MarkPatchNoteRead => "mark_patch_note_read",
            Self::RequestPatchNotes => "request_patch_notes",
            Self::RequestPlayerCount => "request_player_count",
            Self::NewsUpdate => "news_update",
            Self::RequestNews => "request_news",
            Self::CheckUsername => "check_username",
            Self::UsernameAvailable => "username_available",
            Self::UsernameTaken => "username_taken",
            Self::RequestExchangeCode => "request_exchange_code",
            Self::ExchangeCode => "exchange_code",
            Self::RequestFriends => "request_friends",
            Self::FriendsList => "friends_list",
        }
    }

    /// Whether this kind is produced locally rather than received.
    #[must_use]
    pub fn is_lifecycle(self) -> bool {
        matches!(self, Self::Connected | Self::Disconnected | Self::Error)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_EVENT_KINDS
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}
