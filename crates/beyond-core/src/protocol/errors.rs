//! Wire decoding errors.

use super::kind::EventKind;

/// Failure to turn an inbound text frame into a [`super::SocketEvent`].
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Not a JSON object with a string `type` field.
    #[error("malformed envelope: {0}")]
    Malformed(#[source] serde_json::Error),

    /// `type` names no known event.
    #[error("unknown event type: {0}")]
    UnknownType(String),

    /// `data` does not match the shape for `kind`.
    #[error("invalid payload for {kind}: {source}")]
    InvalidPayload {
        /// Event kind whose payload failed.
        kind: EventKind,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl ProtocolError {
    /// Whether the frame was unreadable, as opposed to merely unrecognized.
    #[must_use]
    pub fn is_parse_failure(&self) -> bool {
        !matches!(self, Self::UnknownType(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_err() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn display_messages() {
        assert!(ProtocolError::Malformed(json_err()).to_string().starts_with("malformed envelope"));
        assert_eq!(
            ProtocolError::UnknownType("foo".into()).to_string(),
            "unknown event type: foo"
        );
        let err = ProtocolError::InvalidPayload {
            kind: EventKind::User,
            source: json_err(),
        };
        assert!(err.to_string().starts_with("invalid payload for user"));
    }

    #[test]
    fn unknown_type_is_not_parse_failure() {
        assert!(!ProtocolError::UnknownType("x".into()).is_parse_failure());
        assert!(ProtocolError::Malformed(json_err()).is_parse_failure());
    }
}
