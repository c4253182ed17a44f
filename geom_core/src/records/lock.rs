//! Store locking.
//!
//! Ownership is decided only by the fs2 exclusive lock on `<store>.lock`.
//! The kernel drops that lock when the holding process exits, so a crash
//! never leaves the store locked. The sidecar's contents are a note about
//! the current holder, read back only to explain a `FileLocked` error.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{GeomError, GeomResult};

/// Who holds the store, as written into the sidecar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct LockHolder {
    pub user_id: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockHolder {
    fn current(user_id: String) -> Self {
        LockHolder {
            user_id,
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    fn describe(&self) -> String {
        format!("{} (pid {})", self.user_id, self.pid)
    }
}

/// Held store lock. Released when dropped.
pub(crate) struct StoreLock {
    file: File,
    holder: LockHolder,
}

impl StoreLock {
    /// Take the lock for the store at `path` without blocking.
    ///
    /// Fails with [`GeomError::FileLocked`] while another open handle holds it.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> GeomResult<Self> {
        let lock_path = sidecar_path(path, "lock");
        let io_error = |action: &str, e: std::io::Error| {
            GeomError::file_error(action, lock_path.display().to_string(), e.to_string())
        };

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| io_error("open lock", e))?;

        if file.try_lock_exclusive().is_err() {
            let holder = read_holder(&mut file);
            let who = holder.as_ref().map_or_else(|| "unknown".to_string(), LockHolder::describe);
            tracing::warn!(path = %path.display(), holder = %who, "record store is locked");
            return Err(match holder {
                Some(h) => GeomError::file_locked(path.display().to_string(), h.describe(), h.locked_at.to_rfc3339()),
                None => GeomError::file_locked(path.display().to_string(), "another process", "unknown"),
            });
        }

        // Leftover note from a process that exited without unlocking
        if let Some(previous) = read_holder(&mut file) {
            tracing::debug!(previous = %previous.describe(), "replacing abandoned lock note");
        }

        let holder = LockHolder::current(user_id.into());
        let note = serde_json::to_vec_pretty(&holder).map_err(GeomError::serialization)?;
        file.set_len(0).map_err(|e| io_error("truncate lock", e))?;
        file.seek(SeekFrom::Start(0)).map_err(|e| io_error("rewind lock", e))?;
        file.write_all(&note).map_err(|e| io_error("write lock", e))?;
        file.sync_all().map_err(|e| io_error("sync lock", e))?;

        Ok(StoreLock { file, holder })
    }

    pub fn holder(&self) -> &LockHolder {
        &self.holder
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        // The sidecar stays on disk; removing it would let a waiter lock an unlinked inode.
        let _ = self.file.set_len(0);
        let _ = self.file.unlock();
    }
}

/// `store.json` -> `store.json.<suffix>`
pub(crate) fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut sidecar = path.to_path_buf();
    let extension = sidecar
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    sidecar.set_extension(extension);
    sidecar
}

/// Holder note in the sidecar, if it has one and it parses.
fn read_holder(file: &mut File) -> Option<LockHolder> {
    let mut contents = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut contents).ok()?;
    serde_json::from_str(&contents).ok()
}
