//! JSON frames exchanged with relay clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sent to a client right after the handshake.
pub const EVENT_WELCOME: &str = "welcome";
/// Client asks to join `room`.
pub const EVENT_JOIN: &str = "join";
/// Server acknowledgement of a join.
pub const EVENT_JOINED: &str = "joined";
/// Client asks for `data` to go to everyone else in `room`.
pub const EVENT_BROADCAST: &str = "broadcast";
/// Reply to any other event.
pub const EVENT_ECHO: &str = "echo";
/// Server could not make sense of a frame.
pub const EVENT_ERROR: &str = "error";

/// One relay message: `{"event": ..., "data": ..., "room": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

impl RelayFrame {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
            room: None,
        }
    }

    pub fn in_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    pub fn to_json(&self) -> String {
        // Value and String fields always serialize.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_room_omitted_when_absent() {
        let frame = RelayFrame::new(EVENT_ECHO, json!({"n": 1}));
        assert_eq!(frame.to_json(), r#"{"event":"echo","data":{"n":1}}"#);
    }

    #[test]
    fn test_parse_defaults_missing_data() {
        let frame = RelayFrame::parse(r#"{"event":"join","room":"ride-1"}"#).unwrap();
        assert_eq!(frame.event, EVENT_JOIN);
        assert_eq!(frame.data, Value::Null);
        assert_eq!(frame.room.as_deref(), Some("ride-1"));
    }

    #[test]
    fn test_parse_rejects_missing_event() {
        assert!(RelayFrame::parse(r#"{"data":1}"#).is_err());
    }
}
