//! The [`SocketEvent`] tagged union.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::kind::EventKind;
use super::payloads::{
    BeyondUser, CloseInfo, ErrorPayload, FriendsList, NewsUpdate, PatchNoteRead,
    PatchNotesUpdate, PlayerCountUpdate, ProfileUpdate, UsernameAvailability, UsernamePayload,
};

/// One event of the realtime vocabulary together with its payload.
///
/// Serializes adjacently tagged as `{"type": ..., "data": ...}`; payload-less
/// kinds serialize without `data`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SocketEvent {
    /// The socket opened.
    Connected,
    /// The socket closed.
    Disconnected(CloseInfo),
    /// A connection, protocol or server error.
    Error(ErrorPayload),
    /// Keep-alive frame.
    Heartbeat,
    /// Full user record.
    User(BeyondUser),
    /// Username change confirmed.
    NewUsername(UsernamePayload),
    /// Ask for the user record.
    RequestUser,
    /// Credentials accepted.
    Authenticated,
    /// Onboarding finished.
    SetupComplete,
    /// Request a username change.
    SetNewUsername(UsernamePayload),
    /// Ask for a heartbeat.
    RequestHeartbeat,
    /// Ask for a profile refresh.
    RequestProfileUpdate,
    /// Profile refresh.
    ProfileUpdate(ProfileUpdate),
    /// Patch notes list.
    PatchNotesUpdate(PatchNotesUpdate),
    /// Player counters.
    PlayerCountUpdate(PlayerCountUpdate),
    /// Mark a patch note as read.
    MarkPatchNoteRead(PatchNoteRead),
    /// Ask for patch notes.
    RequestPatchNotes,
    /// Ask for player counters.
    RequestPlayerCount,
    /// News list.
    NewsUpdate(NewsUpdate),
    /// Ask for news.
    RequestNews,
    /// Ask whether a username is free.
    CheckUsername(UsernamePayload),
    /// Availability answer.
    UsernameAvailable(UsernameAvailability),
    /// Username taken.
    UsernameTaken(UsernamePayload),
    /// Ask for an exchange code.
    RequestExchangeCode,
    /// One-time exchange code.
    ExchangeCode(String),
    /// Ask for the friends list.
    RequestFriends,
    /// Friends list.
    FriendsList(FriendsList),
}

fn payload<T: DeserializeOwned>(data: Value) -> serde_json::Result<T> {
    serde_json::from_value(data)
}

impl SocketEvent {
    /// The kind of this event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Connected => EventKind::Connected,
            Self::Disconnected(_) => EventKind::Disconnected,
            Self::Error(_) => EventKind::Error,
            Self::Heartbeat => EventKind::Heartbeat,
            Self::User(_) => EventKind::User,
            Self::NewUsername(_) => EventKind::NewUsername,
            Self::RequestUser => EventKind::RequestUser,
            Self::Authenticated => EventKind::Authenticated,
            Self::SetupComplete => EventKind::SetupComplete,
            Self::SetNewUsername(_) => EventKind::SetNewUsername,
            Self::RequestHeartbeat => EventKind::RequestHeartbeat,
            Self::RequestProfileUpdate => EventKind::RequestProfileUpdate,
            Self::ProfileUpdate(_) => EventKind::ProfileUpdate,
            Self::PatchNotesUpdate(_) => EventKind::PatchNotesUpdate,
            Self::PlayerCountUpdate(_) => EventKind::PlayerCountUpdate,
            Self::MarkPatchNoteRead(_) => EventKind::MarkPatchNoteRead,
            Self::RequestPatchNotes => EventKind::RequestPatchNotes,
            Self::RequestPlayerCount => EventKind::RequestPlayerCount,
            Self::NewsUpdate(_) => EventKind::NewsUpdate,
            Self::RequestNews => EventKind::RequestNews,
            Self::CheckUsername(_) => EventKind::CheckUsername,
            Self::UsernameAvailable(_) => EventKind::UsernameAvailable,
            Self::UsernameTaken(_) => EventKind::UsernameTaken,
            Self::RequestExchangeCode => EventKind::RequestExchangeCode,
            Self::ExchangeCode(_) => EventKind::ExchangeCode,
            Self::RequestFriends => EventKind::RequestFriends,
            Self::FriendsList(_) => EventKind::FriendsList,
        }
    }

    /// Build an event from its kind and raw `data`.
    ///
    /// Payload-less kinds ignore `data` entirely.
    pub fn from_parts(kind: EventKind, data: Value) -> serde_json::Result<Self> {
        Ok(match kind {
            EventKind::Connected => Self::Connected,
            EventKind::Disconnected => Self::Disconnected(payload(data)?),
            EventKind::Error => Self::Error(payload(data)?),
            EventKind::Heartbeat => Self::Heartbeat,
            EventKind::User => Self::User(payload(data)?),
            EventKind::NewUsername => Self::NewUsername(payload(data)?),
            EventKind::RequestUser => Self::RequestUser,
            EventKind::Authenticated => Self::Authenticated,
            EventKind::SetupComplete => Self::SetupComplete,
            EventKind::SetNewUsername => Self::SetNewUsername(payload(data)?),
            EventKind::RequestHeartbeat => Self::RequestHeartbeat,
            EventKind::RequestProfileUpdate => Self::RequestProfileUpdate,
            EventKind::ProfileUpdate => Self::ProfileUpdate(payload(data)?),
            EventKind::PatchNotesUpdate => Self::PatchNotesUpdate(payload(data)?),
            EventKind::PlayerCountUpdate => Self::PlayerCountUpdate(payload(data)?),
            EventKind::MarkPatchNoteRead => Self::MarkPatchNoteRead(payload(data)?),
            EventKind::RequestPatchNotes => Self::RequestPatchNotes,
            EventKind::RequestPlayerCount => Self::RequestPlayerCount,
            EventKind::NewsUpdate => Self::NewsUpdate(payload(data)?),
            EventKind::RequestNews => Self::RequestNews,
            EventKind::CheckUsername => Self::CheckUsername(payload(data)?),
            EventKind::UsernameAvailable => Self::UsernameAvailable(payload(data)?),
            EventKind::UsernameTaken => Self::UsernameTaken(payload(data)?),
            EventKind::RequestExchangeCode => Self::RequestExchangeCode,
            EventKind::ExchangeCode => Self::ExchangeCode(payload(data)?),
            EventKind::RequestFriends => Self::RequestFriends,
            EventKind::FriendsList => Self::FriendsList(payload(data)?),
        })
    }

    /// Shorthand for a `disconnected` event.
    pub fn disconnected(code: u16, reason: impl Into<String>) -> Self {
        Self::Disconnected(CloseInfo::new(code, reason))
    }

    /// Shorthand for a critical `error` event.
    pub fn critical_error(message: impl Into<String>) -> Self {
        Self::Error(ErrorPayload::critical(message))
    }

    /// Shorthand for a non-critical `error` event.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Error(ErrorPayload::warning(message))
    }
}
