//! Event type identifiers and incoming state events.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A room event type, tagged with whether it is a state event.
///
/// The distinction matters for power levels: state events without an
/// explicit requirement fall back to `state_default`, everything else to
/// `events_default`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventType {
    name: Cow<'static, str>,
    state: bool,
}

impl EventType {
    pub const ROOM_MESSAGE: EventType = EventType::message_const("m.room.message");

    pub const MEMBER: EventType = EventType::state_const("m.room.member");
    pub const POWER_LEVELS: EventType = EventType::state_const("m.room.power_levels");
    pub const ROOM_NAME: EventType = EventType::state_const("m.room.name");
    pub const ROOM_AVATAR: EventType = EventType::state_const("m.room.avatar");
    pub const TOPIC: EventType = EventType::state_const("m.room.topic");

    const fn message_const(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            state: false,
        }
    }

    const fn state_const(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            state: true,
        }
    }

    /// A custom message (timeline) event type.
    pub fn message(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            state: false,
        }
    }

    /// A custom state event type.
    pub fn state(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            state: true,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn is_state(&self) -> bool {
        self.state
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A state event observed from the homeserver, as pushed to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEvent {
    pub room_id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub state_key: String,
    #[serde(default)]
    pub sender: String,
    pub content: serde_json::Value,
}

impl StateEvent {
    pub fn new(
        room_id: impl Into<String>,
        event_type: &EventType,
        state_key: impl Into<String>,
        content: serde_json::Value,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            event_type: event_type.as_str().to_string(),
            state_key: state_key.into(),
            sender: String::new(),
            content,
        }
    }
}
