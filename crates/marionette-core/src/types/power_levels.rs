//! The `m.room.power_levels` document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::EventType;

const DEFAULT_STATE_LEVEL: i64 = 50;
const DEFAULT_MODERATION_LEVEL: i64 = 50;
const DEFAULT_INVITE_LEVEL: i64 = 0;

/// Power levels of a room.
///
/// Optional fields keep the difference between "absent" and "explicitly
/// set" so that a document read from the homeserver is written back
/// unchanged apart from the edited entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PowerLevels {
    #[serde(default)]
    pub users: BTreeMap<String, i64>,
    #[serde(default)]
    pub users_default: i64,

    #[serde(default)]
    pub events: BTreeMap<String, i64>,
    #[serde(default)]
    pub events_default: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_default: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kick: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ban: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redact: Option<i64>,

    /// Keys this type does not model, such as `notifications`.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PowerLevels {
    /// Level of a user, falling back to `users_default`.
    pub fn user_level(&self, user_id: &str) -> i64 {
        self.users
            .get(user_id)
            .copied()
            .unwrap_or(self.users_default)
    }

    /// Set the level of a user. Setting the default level drops the entry.
    pub fn set_user_level(&mut self, user_id: &str, level: i64) {
        if level == self.users_default {
            self.users.remove(user_id);
        } else {
            self.users.insert(user_id.to_string(), level);
        }
    }

    /// Level required to send an event of the given type.
    pub fn event_level(&self, event_type: &EventType) -> i64 {
        match self.events.get(event_type.as_str()) {
            Some(level) => *level,
            None if event_type.is_state() => self.state_default(),
            None => self.events_default,
        }
    }

    /// Set the level required for an event type. Setting the fallback level
    /// drops the entry.
    pub fn set_event_level(&mut self, event_type: &EventType, level: i64) {
        let fallback = if event_type.is_state() {
            self.state_default()
        } else {
            self.events_default
        };
        if level == fallback {
            self.events.remove(event_type.as_str());
        } else {
            self.events.insert(event_type.as_str().to_string(), level);
        }
    }

    pub fn state_default(&self) -> i64 {
        self.state_default.unwrap_or(DEFAULT_STATE_LEVEL)
    }

    pub fn invite(&self) -> i64 {
        self.invite.unwrap_or(DEFAULT_INVITE_LEVEL)
    }

    pub fn kick(&self) -> i64 {
        self.kick.unwrap_or(DEFAULT_MODERATION_LEVEL)
    }

    pub fn ban(&self) -> i64 {
        self.ban.unwrap_or(DEFAULT_MODERATION_LEVEL)
    }

    pub fn redact(&self) -> i64 {
        self.redact.unwrap_or(DEFAULT_MODERATION_LEVEL)
    }
}
