//! JSON envelope framing: `{type, data?, timestamp?, version?}`.

use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use super::errors::ProtocolError;
use super::event::SocketEvent;
use super::kind::EventKind;

/// A decoded inbound frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// The typed event.
    pub event: SocketEvent,
    /// Sender timestamp in ms since the Unix epoch, if present.
    pub timestamp: Option<i64>,
    /// Protocol version string, if present.
    pub version: Option<String>,
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    timestamp: Option<Value>,
    #[serde(default)]
    version: Option<Value>,
}

/// Current time in ms since the Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl Envelope {
    /// Decode one text frame.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let raw: RawEnvelope = serde_json::from_str(text).map_err(ProtocolError::Malformed)?;
        let kind = EventKind::from_str(&raw.event_type).map_err(ProtocolError::UnknownType)?;
        let event = SocketEvent::from_parts(kind, raw.data)
            .map_err(|source| ProtocolError::InvalidPayload { kind, source })?;
        // Metadata of the wrong type is dropped rather than failing the frame.
        Ok(Self {
            event,
            timestamp: raw.timestamp.as_ref().and_then(Value::as_i64),
            version: raw.version.as_ref().and_then(Value::as_str).map(str::to_owned),
        })
    }

    /// Encode an outbound frame stamped with `version` and `timestamp_ms`.
    pub fn encode(
        event: &SocketEvent,
        version: &str,
        timestamp_ms: i64,
    ) -> Result<String, serde_json::Error> {
        let mut value = serde_json::to_value(event)?;
        if let Value::Object(map) = &mut value {
            let _ = map.insert("timestamp".into(), Value::from(timestamp_ms));
            let _ = map.insert("version".into(), Value::from(version));
        }
        serde_json::to_string(&value)
    }
}
