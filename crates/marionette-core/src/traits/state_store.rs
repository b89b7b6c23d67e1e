//! State store trait: the local mirror of remote state.

use tracing::{debug, warn};

use crate::types::{EventType, Member, Membership, PowerLevels, StateEvent};

/// Timeout value passed to [`StateStore::set_typing`] to record "not typing".
pub const NOT_TYPING: i64 = -1;

/// Cache of homeserver state consulted before any state-establishing call.
///
/// Reads never fail: an unknown key answers with its documented default.
/// Writes overwrite the entry for their key and never delete entries.
/// Implementations serialize access internally so a single read or write is
/// atomic with respect to concurrent callers.
pub trait StateStore: Send + Sync {
    // Registration

    /// Whether the user is known to be registered.
    fn is_registered(&self, user_id: &str) -> bool;

    /// Record that the user is registered.
    fn mark_registered(&self, user_id: &str);

    // Membership

    /// The cached member record, or `None` if nothing is known.
    fn try_get_member(&self, room_id: &str, user_id: &str) -> Option<Member>;

    /// Overwrite the membership state, keeping any cached profile fields.
    fn set_membership(&self, room_id: &str, user_id: &str, membership: Membership);

    /// Overwrite the whole member record.
    fn set_member(&self, room_id: &str, user_id: &str, member: Member);

    /// The cached member record, defaulting to a profile-less `leave`.
    fn get_member(&self, room_id: &str, user_id: &str) -> Member {
        self.try_get_member(room_id, user_id).unwrap_or_default()
    }

    /// Whether the cached membership is any of `allowed`.
    fn is_membership(&self, room_id: &str, user_id: &str, allowed: &[Membership]) -> bool {
        let membership = self.get_member(room_id, user_id).membership;
        allowed.contains(&membership)
    }

    fn is_in_room(&self, room_id: &str, user_id: &str) -> bool {
        self.is_membership(room_id, user_id, &[Membership::Join])
    }

    /// Joined users count as invited: they need no further invite.
    fn is_invited(&self, room_id: &str, user_id: &str) -> bool {
        self.is_membership(room_id, user_id, &[Membership::Invite, Membership::Join])
    }

    // Power levels

    /// The cached power level document, if any.
    fn get_power_levels(&self, room_id: &str) -> Option<PowerLevels>;

    /// Overwrite the cached power level document.
    fn set_power_levels(&self, room_id: &str, levels: PowerLevels);

    /// A user's level, read from the zero-value document if nothing is cached.
    fn get_power_level(&self, room_id: &str, user_id: &str) -> i64 {
        self.get_power_levels(room_id)
            .unwrap_or_default()
            .user_level(user_id)
    }

    /// The level needed to send `event_type`.
    fn get_power_level_requirement(&self, room_id: &str, event_type: &EventType) -> i64 {
        self.get_power_levels(room_id)
            .unwrap_or_default()
            .event_level(event_type)
    }

    fn has_power_level(&self, room_id: &str, user_id: &str, event_type: &EventType) -> bool {
        let levels = self.get_power_levels(room_id).unwrap_or_default();
        levels.user_level(user_id) >= levels.event_level(event_type)
    }

    // Typing

    /// Whether the user is currently typing according to the cache.
    fn is_typing(&self, room_id: &str, user_id: &str) -> bool;

    /// Record typing for `timeout_ms` milliseconds; a negative timeout
    /// records "not typing".
    fn set_typing(&self, room_id: &str, user_id: &str, timeout_ms: i64);

    // External updates

    /// Apply a state event observed from the homeserver.
    ///
    /// Membership and power level events update the cache; anything else is
    /// ignored.
    fn update_state(&self, event: &StateEvent) {
        if event.event_type == EventType::MEMBER.as_str() {
            match serde_json::from_value::<Member>(event.content.clone()) {
                Ok(member) => {
                    debug!(
                        room_id = %event.room_id,
                        user_id = %event.state_key,
                        membership = member.membership.as_str(),
                        "Caching membership from event"
                    );
                    self.set_member(&event.room_id, &event.state_key, member);
                }
                Err(e) => warn!(room_id = %event.room_id, "Ignoring malformed member event: {}", e),
            }
        } else if event.event_type == EventType::POWER_LEVELS.as_str() {
            match serde_json::from_value::<PowerLevels>(event.content.clone()) {
                Ok(levels) => {
                    debug!(room_id = %event.room_id, "Caching power levels from event");
                    self.set_power_levels(&event.room_id, levels);
                }
                Err(e) => warn!(
                    room_id = %event.room_id,
                    "Ignoring malformed power levels event: {}", e
                ),
            }
        }
    }
}
