//! Serializable contents of a state store.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::{Member, PowerLevels};

/// Full contents of a [`BasicStateStore`](super::BasicStateStore).
///
/// Typing entries hold an absolute expiry in milliseconds since the epoch,
/// so a reloaded snapshot does not revive stale typing notifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSnapshot {
    pub registrations: BTreeSet<String>,
    pub members: HashMap<String, HashMap<String, Member>>,
    pub power_levels: HashMap<String, PowerLevels>,
    pub typing: HashMap<String, HashMap<String, i64>>,
}
