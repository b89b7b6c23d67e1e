//! State store persisted to a single JSON file.
//!
//! The store keeps a [`BasicStateStore`] in memory and, after every write,
//! replaces the snapshot file with the full store contents. The new
//! snapshot is written to a temporary file in the same directory and then
//! renamed over the old one, so a reader never sees a partial snapshot.

use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use marionette_core::error::{MarionetteError, MarionetteResult};
use marionette_core::{BasicStateStore, Member, Membership, PowerLevels, StateSnapshot, StateStore};
use tempfile::NamedTempFile;
use tracing::{debug, error};

/// Write-through state store backed by a flat file.
///
/// A write that succeeds in memory but cannot be persisted panics: the
/// cache would otherwise claim facts the next process start will not see.
#[derive(Debug)]
pub struct FlatFileStateStore {
    inner: BasicStateStore,
    path: PathBuf,
    /// Serializes snapshot writes.
    save_lock: Mutex<()>,
}

impl FlatFileStateStore {
    /// Open the store at `path`, loading the snapshot if one exists.
    pub fn open(path: impl AsRef<Path>) -> MarionetteResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = match Self::load(&path)? {
            Some(snapshot) => BasicStateStore::from_snapshot(snapshot),
            None => BasicStateStore::new(),
        };

        Ok(Self {
            inner,
            path,
            save_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> MarionetteResult<Option<StateSnapshot>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No state snapshot, starting empty");
                return Ok(None);
            }
            Err(e) => {
                return Err(MarionetteError::Persistence {
                    message: format!("reading state file {}", path.display()),
                    source: Some(Box::new(e)),
                })
            }
        };

        let snapshot = serde_json::from_str(&content).map_err(|e| MarionetteError::Persistence {
            message: format!("parsing state file {}", path.display()),
            source: Some(Box::new(e)),
        })?;
        debug!(path = %path.display(), "Loaded state snapshot");
        Ok(Some(snapshot))
    }

    fn save(&self) -> MarionetteResult<()> {
        let _guard = self.save_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.inner.snapshot();

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            serde_json::to_writer(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            error!(path = %self.path.display(), "Failed to persist state store: {}", e);
            panic!(
                "state store snapshot {} is out of sync with memory: {}",
                self.path.display(),
                e
            );
        }
    }
}

impl StateStore for FlatFileStateStore {
    fn is_registered(&self, user_id: &str) -> bool {
        self.inner.is_registered(user_id)
    }

    fn mark_registered(&self, user_id: &str) {
        self.inner.mark_registered(user_id);
        self.persist();
    }

    fn try_get_member(&self, room_id: &str, user_id: &str) -> Option<Member> {
        self.inner.try_get_member(room_id, user_id)
    }

    fn set_membership(&self, room_id: &str, user_id: &str, membership: Membership) {
        self.inner.set_membership(room_id, user_id, membership);
        self.persist();
    }

    fn set_member(&self, room_id: &str, user_id: &str, member: Member) {
        self.inner.set_member(room_id, user_id, member);
        self.persist();
    }

    fn get_power_levels(&self, room_id: &str) -> Option<PowerLevels> {
        self.inner.get_power_levels(room_id)
    }

    fn set_power_levels(&self, room_id: &str, levels: PowerLevels) {
        self.inner.set_power_levels(room_id, levels);
        self.persist();
    }

    fn is_typing(&self, room_id: &str, user_id: &str) -> bool {
        self.inner.is_typing(room_id, user_id)
    }

    fn set_typing(&self, room_id: &str, user_id: &str, timeout_ms: i64) {
        self.inner.set_typing(room_id, user_id, timeout_ms);
        self.persist();
    }
}
