//! The intent gateway: one virtual user acting on the homeserver.
//!
//! Every remote operation is gated behind a registration or room-join
//! precondition. The [`StateStore`] answers "has this already been done?"
//! and only when it does not know does the intent make the establishing
//! call and record the result.
//!
//! Two homeserver failures are absorbed:
//! - `M_USER_IN_USE` on registration means the account already exists.
//! - `M_FORBIDDEN` on join, when a bot is available, is answered by having
//!   the bot invite this user and joining once more.
//!
//! Every other error is returned unchanged.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::error::MarionetteResult;
use crate::traits::{RemoteClient, StateStore, NOT_TYPING};
use crate::types::{EventType, Membership, PowerLevels};

/// Outcome of an operation that may find nothing to do.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<T> {
    /// The remote call was made and produced `T`.
    Applied(T),
    /// The cached state already matched; no remote call was made.
    Unchanged,
}

impl<T> Change<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// The result of the remote call, if one was made.
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Unchanged => None,
        }
    }
}

/// A virtual user bound to its own client and a shared state store.
pub struct Intent {
    client: Arc<dyn RemoteClient>,
    bot: Option<Arc<dyn RemoteClient>>,
    store: Arc<dyn StateStore>,
    localpart: String,
    user_id: String,
}

impl Intent {
    /// Create an intent without a bot; forbidden joins are not recovered.
    pub fn new(
        localpart: impl Into<String>,
        user_id: impl Into<String>,
        client: Arc<dyn RemoteClient>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            client,
            bot: None,
            store,
            localpart: localpart.into(),
            user_id: user_id.into(),
        }
    }

    /// Use `bot` to invite this user when a join is forbidden.
    pub fn with_bot(mut self, bot: Arc<dyn RemoteClient>) -> Self {
        self.bot = Some(bot);
        self
    }

    pub fn localpart(&self) -> &str {
        &self.localpart
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn has_bot(&self) -> bool {
        self.bot.is_some()
    }

    /// The state store this intent consults.
    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    /// Make sure the account exists.
    pub async fn ensure_registered(&self) -> MarionetteResult<()> {
        if self.store.is_registered(&self.user_id) {
            return Ok(());
        }

        match self.client.register(&self.localpart).await {
            Ok(()) => info!(user_id = %self.user_id, "Registered user"),
            Err(e) if e.is_user_in_use() => {
                debug!(user_id = %self.user_id, "User already registered");
            }
            Err(e) => return Err(e),
        }
        self.store.mark_registered(&self.user_id);
        Ok(())
    }

    /// Make sure this user is joined to the room.
    ///
    /// Membership is recorded under the room ID the homeserver returns,
    /// which differs from `room_id` when an alias was given.
    pub async fn ensure_joined(&self, room_id: &str) -> MarionetteResult<()> {
        if self.store.is_in_room(room_id, &self.user_id) {
            return Ok(());
        }
        self.ensure_registered().await?;

        let joined_room_id = match self.client.join_room(room_id).await {
            Ok(joined) => joined,
            Err(e) if e.is_forbidden() => {
                let Some(bot) = &self.bot else {
                    return Err(e);
                };
                info!(
                    user_id = %self.user_id,
                    room_id,
                    "Join forbidden, inviting through bot and retrying"
                );
                bot.invite_user(room_id, &self.user_id).await?;
                self.client.join_room(room_id).await?
            }
            Err(e) => return Err(e),
        };

        debug!(user_id = %self.user_id, room_id = %joined_room_id, "Joined room");
        self.store
            .set_membership(&joined_room_id, &self.user_id, Membership::Join);
        Ok(())
    }

    pub async fn send_message_event(
        &self,
        room_id: &str,
        event_type: &EventType,
        content: &serde_json::Value,
    ) -> MarionetteResult<String> {
        self.ensure_joined(room_id).await?;
        self.client
            .send_message_event(room_id, event_type, content, None)
            .await
    }

    /// Send a timeline event with an explicit origin timestamp.
    pub async fn send_massaged_message_event(
        &self,
        room_id: &str,
        event_type: &EventType,
        content: &serde_json::Value,
        timestamp: i64,
    ) -> MarionetteResult<String> {
        self.ensure_joined(room_id).await?;
        self.client
            .send_message_event(room_id, event_type, content, Some(timestamp))
            .await
    }

    pub async fn send_state_event(
        &self,
        room_id: &str,
        event_type: &EventType,
        state_key: &str,
        content: &serde_json::Value,
    ) -> MarionetteResult<String> {
        self.ensure_joined(room_id).await?;
        self.client
            .send_state_event(room_id, event_type, state_key, content, None)
            .await
    }

    /// Send a state event with an explicit origin timestamp.
    pub async fn send_massaged_state_event(
        &self,
        room_id: &str,
        event_type: &EventType,
        state_key: &str,
        content: &serde_json::Value,
        timestamp: i64,
    ) -> MarionetteResult<String> {
        self.ensure_joined(room_id).await?;
        self.client
            .send_state_event(room_id, event_type, state_key, content, Some(timestamp))
            .await
    }

    /// Read a state event's content.
    pub async fn state_event(
        &self,
        room_id: &str,
        event_type: &EventType,
        state_key: &str,
    ) -> MarionetteResult<serde_json::Value> {
        self.ensure_joined(room_id).await?;
        self.client.state_event(room_id, event_type, state_key).await
    }

    pub async fn send_text(&self, room_id: &str, text: &str) -> MarionetteResult<String> {
        let content = json!({ "msgtype": "m.text", "body": text });
        self.send_message_event(room_id, &EventType::ROOM_MESSAGE, &content)
            .await
    }

    pub async fn send_notice(&self, room_id: &str, text: &str) -> MarionetteResult<String> {
        let content = json!({ "msgtype": "m.notice", "body": text });
        self.send_message_event(room_id, &EventType::ROOM_MESSAGE, &content)
            .await
    }

    pub async fn send_image(&self, room_id: &str, body: &str, url: &str) -> MarionetteResult<String> {
        let content = json!({ "msgtype": "m.image", "body": body, "url": url });
        self.send_message_event(room_id, &EventType::ROOM_MESSAGE, &content)
            .await
    }

    pub async fn send_video(&self, room_id: &str, body: &str, url: &str) -> MarionetteResult<String> {
        let content = json!({ "msgtype": "m.video", "body": body, "url": url });
        self.send_message_event(room_id, &EventType::ROOM_MESSAGE, &content)
            .await
    }

    pub async fn redact_event(
        &self,
        room_id: &str,
        event_id: &str,
        reason: Option<String>,
    ) -> MarionetteResult<String> {
        self.ensure_joined(room_id).await?;
        self.client.redact_event(room_id, event_id, reason).await
    }

    pub async fn set_room_name(&self, room_id: &str, name: &str) -> MarionetteResult<String> {
        self.send_state_event(room_id, &EventType::ROOM_NAME, "", &json!({ "name": name }))
            .await
    }

    pub async fn set_room_avatar(&self, room_id: &str, url: &str) -> MarionetteResult<String> {
        self.send_state_event(room_id, &EventType::ROOM_AVATAR, "", &json!({ "url": url }))
            .await
    }

    pub async fn set_room_topic(&self, room_id: &str, topic: &str) -> MarionetteResult<String> {
        self.send_state_event(room_id, &EventType::TOPIC, "", &json!({ "topic": topic }))
            .await
    }

    /// The room's power levels, fetched and cached on first use.
    ///
    /// A failed fetch caches nothing.
    pub async fn power_levels(&self, room_id: &str) -> MarionetteResult<PowerLevels> {
        if let Some(levels) = self.store.get_power_levels(room_id) {
            return Ok(levels);
        }

        debug!(room_id, "Power levels not cached, fetching");
        let content = self
            .state_event(room_id, &EventType::POWER_LEVELS, "")
            .await?;
        let levels: PowerLevels = serde_json::from_value(content)?;
        self.store.set_power_levels(room_id, levels.clone());
        Ok(levels)
    }

    /// Replace the room's power levels, caching them once the homeserver
    /// accepts the event.
    pub async fn set_power_levels(
        &self,
        room_id: &str,
        levels: PowerLevels,
    ) -> MarionetteResult<String> {
        let content = serde_json::to_value(&levels)?;
        let event_id = self
            .send_state_event(room_id, &EventType::POWER_LEVELS, "", &content)
            .await?;
        self.store.set_power_levels(room_id, levels);
        Ok(event_id)
    }

    /// Set one user's power level, doing nothing if it is already `level`.
    pub async fn set_power_level(
        &self,
        room_id: &str,
        user_id: &str,
        level: i64,
    ) -> MarionetteResult<Change<String>> {
        let mut levels = self.power_levels(room_id).await?;
        if levels.user_level(user_id) == level {
            return Ok(Change::Unchanged);
        }

        levels.set_user_level(user_id, level);
        self.set_power_levels(room_id, levels)
            .await
            .map(Change::Applied)
    }

    /// Start or stop typing, skipping the call if the cache already agrees.
    pub async fn user_typing(
        &self,
        room_id: &str,
        typing: bool,
        timeout_ms: i64,
    ) -> MarionetteResult<Change<()>> {
        if self.store.is_typing(room_id, &self.user_id) == typing {
            return Ok(Change::Unchanged);
        }
        self.ensure_joined(room_id).await?;

        self.client.user_typing(room_id, typing, timeout_ms).await?;
        let cached_timeout = if typing { timeout_ms } else { NOT_TYPING };
        self.store
            .set_typing(room_id, &self.user_id, cached_timeout);
        Ok(Change::Applied(()))
    }

    pub async fn set_display_name(&self, display_name: &str) -> MarionetteResult<()> {
        self.ensure_registered().await?;
        self.client.set_display_name(display_name).await
    }

    pub async fn set_avatar_url(&self, avatar_url: &str) -> MarionetteResult<()> {
        self.ensure_registered().await?;
        self.client.set_avatar_url(avatar_url).await
    }

    /// Invite `user_id` unless the cache says they are already invited.
    ///
    /// The resulting membership is not recorded here; it arrives through
    /// [`StateStore::update_state`] when the member event is observed.
    pub async fn ensure_invited(&self, room_id: &str, user_id: &str) -> MarionetteResult<Change<()>> {
        if self.store.is_invited(room_id, user_id) {
            return Ok(Change::Unchanged);
        }
        self.client.invite_user(room_id, user_id).await?;
        Ok(Change::Applied(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, MarionetteError};
    use crate::store::BasicStateStore;
    use crate::traits::MockRemoteClient;

    const ROOM: &str = "!room:example.org";
    const USER: &str = "@puppet_1:example.org";

    fn store() -> Arc<BasicStateStore> {
        Arc::new(BasicStateStore::new())
    }

    fn intent(client: MockRemoteClient, store: Arc<BasicStateStore>) -> Intent {
        Intent::new("puppet_1", USER, Arc::new(client), store)
    }

    fn joined_store() -> Arc<BasicStateStore> {
        let store = store();
        store.mark_registered(USER);
        store.set_membership(ROOM, USER, Membership::Join);
        store
    }

    #[tokio::test]
    async fn test_ensure_registered_calls_once() {
        let mut client = MockRemoteClient::new();
        client
            .expect_register()
            .withf(|localpart| localpart == "puppet_1")
            .times(1)
            .returning(|_| Ok(()));
        let store = store();
        let intent = intent(client, store.clone());

        intent.ensure_registered().await.unwrap();
        intent.ensure_registered().await.unwrap();

        assert!(store.is_registered(USER));
    }

    #[tokio::test]
    async fn test_ensure_registered_absorbs_user_in_use() {
        let mut client = MockRemoteClient::new();
        client
            .expect_register()
            .times(1)
            .returning(|_| Err(MarionetteError::user_in_use("User ID already taken")));
        let store = store();
        let intent = intent(client, store.clone());

        intent.ensure_registered().await.unwrap();
        assert!(store.is_registered(USER));
    }

    #[tokio::test]
    async fn test_ensure_registered_propagates_other_errors() {
        let mut client = MockRemoteClient::new();
        client
            .expect_register()
            .times(1)
            .returning(|_| Err(MarionetteError::remote(403, ErrorCode::Exclusive, "not ours")));
        let store = store();
        let intent = intent(client, store.clone());

        let err = intent.ensure_registered().await.unwrap_err();
        assert_eq!(err.code(), Some(&ErrorCode::Exclusive));
        assert!(!store.is_registered(USER));
    }

    #[tokio::test]
    async fn test_ensure_joined_skips_remote_when_cached() {
        let intent = intent(MockRemoteClient::new(), joined_store());
        intent.ensure_joined(ROOM).await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_joined_records_resolved_room_id() {
        let mut client = MockRemoteClient::new();
        client.expect_register().times(1).returning(|_| Ok(()));
        client
            .expect_join_room()
            .withf(|room| room == "#alias:example.org")
            .times(1)
            .returning(|_| Ok(ROOM.to_string()));
        let store = store();
        let intent = intent(client, store.clone());

        intent.ensure_joined("#alias:example.org").await.unwrap();

        assert!(store.is_in_room(ROOM, USER));
        assert!(!store.is_in_room("#alias:example.org", USER));
    }

    #[tokio::test]
    async fn test_forbidden_join_invites_through_bot_and_retries_once() {
        let mut client = MockRemoteClient::new();
        client.expect_register().returning(|_| Ok(()));
        let mut attempts = 0;
        client.expect_join_room().times(2).returning(move |_| {
            attempts += 1;
            if attempts == 1 {
                Err(MarionetteError::forbidden("You are not invited to this room."))
            } else {
                Ok(ROOM.to_string())
            }
        });

        let mut bot = MockRemoteClient::new();
        bot.expect_invite_user()
            .withf(|room, user| room == ROOM && user == USER)
            .times(1)
            .returning(|_, _| Ok(()));

        let store = store();
        let intent = intent(client, store.clone()).with_bot(Arc::new(bot));

        intent.ensure_joined(ROOM).await.unwrap();
        assert!(store.is_in_room(ROOM, USER));
    }

    #[tokio::test]
    async fn test_failed_retry_returns_retry_error() {
        let mut client = MockRemoteClient::new();
        client.expect_register().returning(|_| Ok(()));
        let mut attempts = 0;
        client.expect_join_room().times(2).returning(move |_| {
            attempts += 1;
            if attempts == 1 {
                Err(MarionetteError::forbidden("not invited"))
            } else {
                Err(MarionetteError::remote(404, ErrorCode::NotFound, "room gone"))
            }
        });

        let mut bot = MockRemoteClient::new();
        bot.expect_invite_user().times(1).returning(|_, _| Ok(()));

        let store = store();
        let intent = intent(client, store.clone()).with_bot(Arc::new(bot));

        let err = intent.ensure_joined(ROOM).await.unwrap_err();
        assert_eq!(err.code(), Some(&ErrorCode::NotFound));
        assert!(!store.is_in_room(ROOM, USER));
    }

    #[tokio::test]
    async fn test_forbidden_join_without_bot_fails_immediately() {
        let mut client = MockRemoteClient::new();
        client.expect_register().returning(|_| Ok(()));
        client
            .expect_join_room()
            .times(1)
            .returning(|_| Err(MarionetteError::forbidden("not invited")));

        let intent = intent(client, store());

        let err = intent.ensure_joined(ROOM).await.unwrap_err();
        assert!(err.is_forbidden());
    }

    #[tokio::test]
    async fn test_failed_invite_is_propagated() {
        let mut client = MockRemoteClient::new();
        client.expect_register().returning(|_| Ok(()));
        client
            .expect_join_room()
            .times(1)
            .returning(|_| Err(MarionetteError::forbidden("not invited")));

        let mut bot = MockRemoteClient::new();
        bot.expect_invite_user()
            .times(1)
            .returning(|_, _| Err(MarionetteError::network("connection refused")));

        let intent = intent(client, store()).with_bot(Arc::new(bot));

        let err = intent.ensure_joined(ROOM).await.unwrap_err();
        assert!(matches!(err, MarionetteError::Network { .. }));
    }

    #[tokio::test]
    async fn test_send_is_short_circuited_by_failed_join() {
        let mut client = MockRemoteClient::new();
        client
            .expect_register()
            .returning(|_| Err(MarionetteError::network("timeout")));
        client.expect_send_message_event().never();

        let intent = intent(client, store());

        assert!(intent.send_text(ROOM, "hello").await.is_err());
    }

    #[tokio::test]
    async fn test_send_text_when_joined() {
        let mut client = MockRemoteClient::new();
        client
            .expect_send_message_event()
            .withf(|room, event_type, content, ts| {
                room == ROOM
                    && *event_type == EventType::ROOM_MESSAGE
                    && content["msgtype"] == "m.text"
                    && content["body"] == "hello"
                    && ts.is_none()
            })
            .times(1)
            .returning(|_, _, _, _| Ok("$event".to_string()));

        let intent = intent(client, joined_store());

        assert_eq!(intent.send_text(ROOM, "hello").await.unwrap(), "$event");
    }

    #[tokio::test]
    async fn test_massaged_send_passes_timestamp() {
        let mut client = MockRemoteClient::new();
        client
            .expect_send_state_event()
            .withf(|_, event_type, _, _, ts| *event_type == EventType::TOPIC && *ts == Some(1234))
            .times(1)
            .returning(|_, _, _, _, _| Ok("$state".to_string()));

        let intent = intent(client, joined_store());
        let event_id = intent
            .send_massaged_state_event(ROOM, &EventType::TOPIC, "", &json!({"topic": "t"}), 1234)
            .await
            .unwrap();
        assert_eq!(event_id, "$state");
    }

    #[tokio::test]
    async fn test_profile_updates_only_need_registration() {
        let mut client = MockRemoteClient::new();
        client.expect_register().times(1).returning(|_| Ok(()));
        client.expect_join_room().never();
        client
            .expect_set_display_name()
            .withf(|name| name == "Puppet")
            .times(1)
            .returning(|_| Ok(()));
        client.expect_set_avatar_url().times(1).returning(|_| Ok(()));

        let intent = intent(client, store());

        intent.set_display_name("Puppet").await.unwrap();
        intent.set_avatar_url("mxc://example.org/avatar").await.unwrap();
    }

    #[tokio::test]
    async fn test_power_levels_fetched_once() {
        let mut client = MockRemoteClient::new();
        client
            .expect_state_event()
            .withf(|_, event_type, key| *event_type == EventType::POWER_LEVELS && key.is_empty())
            .times(1)
            .returning(|_, _, _| Ok(json!({"users": {USER: 100}})));

        let store = joined_store();
        let intent = intent(client, store.clone());

        assert_eq!(intent.power_levels(ROOM).await.unwrap().user_level(USER), 100);
        assert_eq!(intent.power_levels(ROOM).await.unwrap().user_level(USER), 100);
        assert_eq!(store.get_power_level(ROOM, USER), 100);
    }

    #[tokio::test]
    async fn test_failed_power_level_fetch_caches_nothing() {
        let mut client = MockRemoteClient::new();
        client
            .expect_state_event()
            .times(1)
            .returning(|_, _, _| Err(MarionetteError::remote(404, ErrorCode::NotFound, "no state")));

        let store = joined_store();
        let intent = intent(client, store.clone());

        assert!(intent.power_levels(ROOM).await.is_err());
        assert!(store.get_power_levels(ROOM).is_none());
    }

    #[tokio::test]
    async fn test_set_power_level_noop_when_unchanged() {
        let store = joined_store();
        let mut levels = PowerLevels::default();
        levels.set_user_level("@other:example.org", 50);
        store.set_power_levels(ROOM, levels);

        let intent = intent(MockRemoteClient::new(), store);

        let change = intent
            .set_power_level(ROOM, "@other:example.org", 50)
            .await
            .unwrap();
        assert!(change.is_unchanged());
    }

    #[tokio::test]
    async fn test_set_power_level_updates_cache() {
        let mut client = MockRemoteClient::new();
        client
            .expect_send_state_event()
            .withf(|_, event_type, _, content, _| {
                *event_type == EventType::POWER_LEVELS
                    && content["users"]["@other:example.org"] == 75
            })
            .times(1)
            .returning(|_, _, _, _, _| Ok("$pl".to_string()));

        let store = joined_store();
        store.set_power_levels(ROOM, PowerLevels::default());
        let intent = intent(client, store.clone());

        let change = intent
            .set_power_level(ROOM, "@other:example.org", 75)
            .await
            .unwrap();

        assert_eq!(change, Change::Applied("$pl".to_string()));
        assert_eq!(store.get_power_level(ROOM, "@other:example.org"), 75);
    }

    #[tokio::test]
    async fn test_set_power_level_keeps_unmodelled_keys() {
        let mut client = MockRemoteClient::new();
        client
            .expect_state_event()
            .times(1)
            .returning(|_, _, _| {
                Ok(serde_json::json!({
                    "users": {"@admin:example.org": 100},
                    "notifications": {"room": 100},
                    "historical": 100
                }))
            });
        client
            .expect_send_state_event()
            .withf(|_, _, _, content, _| {
                content["notifications"]["room"] == 100
                    && content["historical"] == 100
                    && content["users"]["@admin:example.org"] == 100
                    && content["users"]["@other:example.org"] == 50
            })
            .times(1)
            .returning(|_, _, _, _, _| Ok("$pl".to_string()));

        let store = joined_store();
        let intent = intent(client, store.clone());

        let change = intent
            .set_power_level(ROOM, "@other:example.org", 50)
            .await
            .unwrap();

        assert_eq!(change, Change::Applied("$pl".to_string()));
        let cached = store.get_power_levels(ROOM).unwrap();
        assert_eq!(cached.extra["historical"], 100);
    }

    #[tokio::test]
    async fn test_rejected_power_level_keeps_old_cache() {
        let mut client = MockRemoteClient::new();
        client
            .expect_send_state_event()
            .times(1)
            .returning(|_, _, _, _, _| Err(MarionetteError::forbidden("insufficient level")));

        let store = joined_store();
        store.set_power_levels(ROOM, PowerLevels::default());
        let intent = intent(client, store.clone());

        assert!(intent.set_power_level(ROOM, USER, 100).await.is_err());
        assert_eq!(store.get_power_level(ROOM, USER), 0);
    }

    #[tokio::test]
    async fn test_typing_suppression() {
        let mut client = MockRemoteClient::new();
        client
            .expect_user_typing()
            .withf(|_, typing, timeout| *typing && *timeout == 30_000)
            .times(1)
            .returning(|_, _, _| Ok(()));
        client
            .expect_user_typing()
            .withf(|_, typing, _| !*typing)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let store = joined_store();
        let intent = intent(client, store.clone());

        assert_eq!(intent.user_typing(ROOM, true, 30_000).await.unwrap(), Change::Applied(()));
        assert!(intent.user_typing(ROOM, true, 30_000).await.unwrap().is_unchanged());
        assert!(store.is_typing(ROOM, USER));

        assert_eq!(intent.user_typing(ROOM, false, 30_000).await.unwrap(), Change::Applied(()));
        assert!(!store.is_typing(ROOM, USER));
        assert!(intent.user_typing(ROOM, false, 0).await.unwrap().is_unchanged());
    }

    #[tokio::test]
    async fn test_failed_typing_call_leaves_cache() {
        let mut client = MockRemoteClient::new();
        client
            .expect_user_typing()
            .times(1)
            .returning(|_, _, _| Err(MarionetteError::network("reset")));

        let store = joined_store();
        let intent = intent(client, store.clone());

        assert!(intent.user_typing(ROOM, true, 30_000).await.is_err());
        assert!(!store.is_typing(ROOM, USER));
    }

    #[tokio::test]
    async fn test_ensure_invited() {
        let mut client = MockRemoteClient::new();
        client
            .expect_invite_user()
            .withf(|room, user| room == ROOM && user == "@guest:example.org")
            .times(1)
            .returning(|_, _| Ok(()));

        let store = joined_store();
        store.set_membership(ROOM, "@member:example.org", Membership::Join);
        let intent = intent(client, store.clone());

        assert!(intent
            .ensure_invited(ROOM, "@member:example.org")
            .await
            .unwrap()
            .is_unchanged());
        assert_eq!(
            intent.ensure_invited(ROOM, "@guest:example.org").await.unwrap(),
            Change::Applied(())
        );
        // Recording the invite is left to the member event.
        assert!(!store.is_invited(ROOM, "@guest:example.org"));
    }

    #[tokio::test]
    async fn test_room_metadata_setters() {
        let mut client = MockRemoteClient::new();
        client
            .expect_send_state_event()
            .withf(|_, event_type, _, content, _| {
                (*event_type == EventType::ROOM_NAME && content["name"] == "Lobby")
                    || (*event_type == EventType::TOPIC && content["topic"] == "Chat")
                    || (*event_type == EventType::ROOM_AVATAR && content["url"] == "mxc://a/b")
            })
            .times(3)
            .returning(|_, _, _, _, _| Ok("$state".to_string()));
        client
            .expect_redact_event()
            .withf(|_, event_id, reason| event_id == "$spam" && reason.as_deref() == Some("spam"))
            .times(1)
            .returning(|_, _, _| Ok("$redaction".to_string()));

        let intent = intent(client, joined_store());

        intent.set_room_name(ROOM, "Lobby").await.unwrap();
        intent.set_room_topic(ROOM, "Chat").await.unwrap();
        intent.set_room_avatar(ROOM, "mxc://a/b").await.unwrap();
        intent
            .redact_event(ROOM, "$spam", Some("spam".to_string()))
            .await
            .unwrap();
    }
}
