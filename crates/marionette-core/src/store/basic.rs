//! In-memory state store.

use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use super::StateSnapshot;
use crate::traits::StateStore;
use crate::types::{Member, Membership, PowerLevels};

type RoomMap<T> = HashMap<String, HashMap<String, T>>;

/// State store backed by in-memory maps.
///
/// Each capability sits behind its own lock, so registration lookups never
/// wait on membership writes and vice versa.
#[derive(Debug, Default)]
pub struct BasicStateStore {
    registrations: RwLock<BTreeSet<String>>,
    members: RwLock<RoomMap<Member>>,
    power_levels: RwLock<HashMap<String, PowerLevels>>,
    typing: RwLock<RoomMap<i64>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl BasicStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding exactly the contents of `snapshot`.
    pub fn from_snapshot(snapshot: StateSnapshot) -> Self {
        Self {
            registrations: RwLock::new(snapshot.registrations),
            members: RwLock::new(snapshot.members),
            power_levels: RwLock::new(snapshot.power_levels),
            typing: RwLock::new(snapshot.typing),
        }
    }

    /// Copy out the full contents of the store.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            registrations: read(&self.registrations).clone(),
            members: read(&self.members).clone(),
            power_levels: read(&self.power_levels).clone(),
            typing: read(&self.typing).clone(),
        }
    }
}

impl StateStore for BasicStateStore {
    fn is_registered(&self, user_id: &str) -> bool {
        read(&self.registrations).contains(user_id)
    }

    fn mark_registered(&self, user_id: &str) {
        write(&self.registrations).insert(user_id.to_string());
    }

    fn try_get_member(&self, room_id: &str, user_id: &str) -> Option<Member> {
        read(&self.members)
            .get(room_id)
            .and_then(|room| room.get(user_id))
            .cloned()
    }

    fn set_membership(&self, room_id: &str, user_id: &str, membership: Membership) {
        let mut members = write(&self.members);
        members
            .entry(room_id.to_string())
            .or_default()
            .entry(user_id.to_string())
            .or_default()
            .membership = membership;
    }

    fn set_member(&self, room_id: &str, user_id: &str, member: Member) {
        write(&self.members)
            .entry(room_id.to_string())
            .or_default()
            .insert(user_id.to_string(), member);
    }

    fn get_power_levels(&self, room_id: &str) -> Option<PowerLevels> {
        read(&self.power_levels).get(room_id).cloned()
    }

    fn set_power_levels(&self, room_id: &str, levels: PowerLevels) {
        write(&self.power_levels).insert(room_id.to_string(), levels);
    }

    fn is_typing(&self, room_id: &str, user_id: &str) -> bool {
        read(&self.typing)
            .get(room_id)
            .and_then(|room| room.get(user_id))
            .is_some_and(|expires_at| *expires_at > Utc::now().timestamp_millis())
    }

    fn set_typing(&self, room_id: &str, user_id: &str, timeout_ms: i64) {
        let expires_at = if timeout_ms < 0 {
            crate::traits::NOT_TYPING
        } else {
            Utc::now().timestamp_millis().saturating_add(timeout_ms)
        };
        write(&self.typing)
            .entry(room_id.to_string())
            .or_default()
            .insert(user_id.to_string(), expires_at);
    }
}
