//! Typed `data` payloads, one per event kind that carries data.
//!
//! Field names follow the server's JSON: camelCase for feed/social payloads,
//! PascalCase for the user record. User-record structs default every field so
//! partial objects from the server decode without loss.

use serde::{Deserialize, Serialize};

use crate::constants::{CLOSE_AUTH_REJECTED, CLOSE_NORMAL};

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// Close code and reason carried by `disconnected`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseInfo {
    /// WebSocket close code.
    pub code: u16,
    /// Close reason (may be empty).
    #[serde(default)]
    pub reason: String,
}

impl CloseInfo {
    /// Build a close info.
    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// Whether the server rejected the connection's credentials.
    #[must_use]
    pub fn is_auth_rejection(&self) -> bool {
        self.code == CLOSE_AUTH_REJECTED
    }

    /// Whether this is a normal close.
    #[must_use]
    pub fn is_normal(&self) -> bool {
        self.code == CLOSE_NORMAL
    }
}

/// Payload of `error`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable message.
    pub message: String,
    /// Whether the error affects the session as a whole.
    #[serde(default)]
    pub critical: bool,
    /// Optional machine-readable category (e.g. `unknown_message`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ErrorPayload {
    /// A critical error.
    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            critical: true,
            error_type: None,
        }
    }

    /// A non-critical error.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            critical: false,
            error_type: None,
        }
    }

    /// Attach a machine-readable category.
    #[must_use]
    pub fn with_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User record
// ─────────────────────────────────────────────────────────────────────────────

/// The account record pushed by `user` and `profile_update`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeyondUser {
    /// Account ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Friend account IDs.
    #[serde(rename = "Friends", skip_serializing_if = "Option::is_none")]
    pub friends: Option<Vec<String>>,
    /// Account details; absent in partial records.
    #[serde(rename = "UserAccount", skip_serializing_if = "Option::is_none")]
    pub user_account: Option<UserAccount>,
    /// Game profiles.
    #[serde(rename = "Profiles", skip_serializing_if = "Option::is_none")]
    pub profiles: Option<Profiles>,
    /// Session token echoed by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Account details of a [`BeyondUser`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAccount {
    /// Linked Discord ID.
    #[serde(rename = "DiscordID")]
    pub discord_id: String,
    /// Role names.
    #[serde(rename = "Roles")]
    pub roles: Vec<String>,
    /// Display color of the highest role.
    #[serde(rename = "RoleColor")]
    pub role_color: String,
    /// Avatar URL.
    #[serde(rename = "Avatar")]
    pub avatar: String,
    /// Public display name.
    #[serde(rename = "DisplayName")]
    pub display_name: String,
}

/// Game profiles of a [`BeyondUser`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Profiles {
    /// Battle-pass / progression profile.
    pub athena: AthenaProfile,
    /// Currency profile.
    pub common_core: CommonCoreProfile,
}

/// Progression profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AthenaProfile {
    /// Selected character.
    pub favorite_character: String,
    /// Season level.
    pub season_level: u32,
    /// Season experience.
    pub season_xp: u64,
    /// Whether the season book was bought.
    pub book_purchased: bool,
    /// Book level.
    pub book_level: u32,
    /// Book experience.
    pub book_xp: u64,
}

/// Currency profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CommonCoreProfile {
    /// Premium currency balance.
    pub vbucks: i64,
}

/// Payload of `profile_update`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// The refreshed user record.
    pub user: BeyondUser,
}

// ─────────────────────────────────────────────────────────────────────────────
// Username
// ─────────────────────────────────────────────────────────────────────────────

/// Payload carrying just a username (`new_username`, `set_new_username`,
/// `check_username`, `username_taken`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernamePayload {
    /// The username.
    pub username: String,
}

impl UsernamePayload {
    /// Build from any string.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Payload of `username_available`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernameAvailability {
    /// The username that was checked.
    pub username: String,
    /// Whether it is free.
    pub available: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Home feed
// ─────────────────────────────────────────────────────────────────────────────

/// One patch note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchNote {
    /// Note ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// Subtitle.
    pub subtitle: String,
    /// Publication date as sent by the server.
    pub date: String,
    /// Author name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// View counter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    /// Markdown body.
    pub content: String,
    /// Header image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Payload of `patch_notes_update`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchNotesUpdate {
    /// Current patch notes, newest first.
    pub patch_notes: Vec<PatchNote>,
}

/// Payload of `mark_patch_note_read`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchNoteRead {
    /// The note that was read.
    pub note_id: String,
}

/// Payload of `player_count_update`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCountUpdate {
    /// Players online globally.
    pub players_online: u64,
    /// Friends of this user online.
    pub friends_online: u64,
}

/// One news card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// News ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// Subtitle.
    pub subtitle: String,
    /// Body text.
    pub description: String,
    /// Background image URL.
    pub background_image: String,
}

/// Payload of `news_update`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsUpdate {
    /// Current news cards.
    pub news: Vec<NewsItem>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Social
// ─────────────────────────────────────────────────────────────────────────────

/// Presence of a friend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    /// Online.
    Online,
    /// Away.
    Away,
    /// Offline.
    Offline,
}

/// One friend entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    /// Account ID.
    pub id: String,
    /// Display name.
    pub display_name: String,
    /// Avatar URL.
    pub avatar: String,
    /// Linked Discord ID.
    pub discord_id: String,
    /// Presence.
    pub status: FriendStatus,
    /// Free-form presence text.
    pub presence: String,
}

/// Payload of `friends_list`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendsList {
    /// All friends.
    pub friends: Vec<Friend>,
}
