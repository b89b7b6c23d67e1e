//! Room membership types.

use serde::{Deserialize, Serialize};

/// Membership state of a user in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    Invite,
    Join,
    Knock,
    #[default]
    Leave,
    Ban,
}

impl Membership {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invite => "invite",
            Self::Join => "join",
            Self::Knock => "knock",
            Self::Leave => "leave",
            Self::Ban => "ban",
        }
    }
}

/// Content of an `m.room.member` event, as cached per (room, user).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Member {
    pub membership: Membership,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Member {
    pub fn new(membership: Membership) -> Self {
        Self {
            membership,
            displayname: None,
            avatar_url: None,
        }
    }

    /// Set the display name.
    pub fn with_displayname(mut self, name: impl Into<String>) -> Self {
        self.displayname = Some(name.into());
        self
    }

    /// Set the avatar URL.
    pub fn with_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}
