//! Remote client trait: the homeserver calls an intent performs.

use async_trait::async_trait;

use crate::error::MarionetteResult;
use crate::types::EventType;

/// Homeserver operations performed as one user.
///
/// Every call either succeeds or fails with a [`MarionetteError`] whose
/// [`ErrorCode`] identifies homeserver refusals. Timeouts and retries are
/// the implementation's concern.
///
/// [`MarionetteError`]: crate::error::MarionetteError
/// [`ErrorCode`]: crate::error::ErrorCode
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Register the account with the given localpart.
    async fn register(&self, localpart: &str) -> MarionetteResult<()>;

    /// Join a room by ID or alias, returning the resolved room ID.
    async fn join_room(&self, room_id_or_alias: &str) -> MarionetteResult<String>;

    /// Invite another user to a room.
    async fn invite_user(&self, room_id: &str, user_id: &str) -> MarionetteResult<()>;

    /// Send a timeline event, returning its event ID.
    async fn send_message_event(
        &self,
        room_id: &str,
        event_type: &EventType,
        content: &serde_json::Value,
        timestamp: Option<i64>,
    ) -> MarionetteResult<String>;

    /// Send a state event, returning its event ID.
    async fn send_state_event(
        &self,
        room_id: &str,
        event_type: &EventType,
        state_key: &str,
        content: &serde_json::Value,
        timestamp: Option<i64>,
    ) -> MarionetteResult<String>;

    /// Read the content of a state event.
    async fn state_event(
        &self,
        room_id: &str,
        event_type: &EventType,
        state_key: &str,
    ) -> MarionetteResult<serde_json::Value>;

    /// Redact an event, returning the redaction's event ID.
    async fn redact_event(
        &self,
        room_id: &str,
        event_id: &str,
        reason: Option<String>,
    ) -> MarionetteResult<String>;

    /// Start or stop the typing notification.
    async fn user_typing(&self, room_id: &str, typing: bool, timeout_ms: i64)
        -> MarionetteResult<()>;

    async fn set_display_name(&self, display_name: &str) -> MarionetteResult<()>;

    async fn set_avatar_url(&self, avatar_url: &str) -> MarionetteResult<()>;
}
