//! # Engine - EmberKV Storage Engine
//!
//! The central orchestrator that ties together the [`record`] codec and the
//! in-memory [`keydir`] into a Bitcask-style key-value store: an append-only
//! log on disk, constant-time lookups through the keydir, and a multi-file
//! merge pipeline that reclaims space from overwritten and deleted keys.
//!
//! ## Architecture
//!
//! ```text
//! Client
//!   |
//!   v
//! ┌───────────────────────────────────────────────┐
//! │                   STORE                       │
//! │                                               │
//! │ write.rs → append to data.txt → keydir update │
//! │              |                                │
//! │              |  rotate() (caller-triggered)   │
//! │              v                                │
//! │ rotate.rs → seal data.txt → data_<ts>.log     │
//! │              |                                │
//! │              |  (log count >= threshold?)     │
//! │              |            yes                 │
//! │              v                                │
//! │ merge.rs  → one compacted log, newest wins    │
//! │ hint.rs   → <compacted>.hint offset index     │
//! │ index.rs  → keydir rebuilt from hint files    │
//! │                                               │
//! │ read.rs   → keydir lookup → seek → value      │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Module Responsibilities
//!
//! | Module     | Purpose                                              |
//! |------------|------------------------------------------------------|
//! | [`lib.rs`] | `Store` handle, `open()`, accessors, `Debug`, `Drop` |
//! | [`active`] | Buffered append handle over `data.txt`               |
//! | [`write`]  | `put()` / `delete()` and keydir maintenance          |
//! | [`read`]   | `get()`: seek the record a keydir entry points at    |
//! | [`rotate`] | Seal the active log, trigger merge at the threshold  |
//! | [`merge`]  | Newest-wins compaction of sealed logs                |
//! | [`hint`]   | Offset index over one compacted log                  |
//! | [`index`]  | Keydir rebuild from hint files                       |
//! | [`files`]  | Naming scheme and timestamp ordering                 |
//!
//! ## Durability
//!
//! Appends are buffered; the keydir is only updated after the append
//! returns, so a partial write leaves unreferenced bytes at the log tail.
//! Rotation commits by atomic rename under an OS-level advisory lock
//! (`data.txt.lock`). Startup recovery reads hint files only — records
//! appended since the last merge are not reindexed.

mod active;
mod error;
mod files;
mod hint;
mod index;
mod merge;
mod read;
mod rotate;
mod write;

pub use error::{Result, StoreError};
pub use files::{ACTIVE_LOG, LOCK_FILE, MAX_IMMUTABLES, MERGE_OUTPUT};
pub use hint::create_hint_file;
pub use index::build_keydir;
pub use merge::merge_logs;

use active::ActiveLog;
use keydir::KeyDir;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// An opened store: the single-writer handle over one directory.
///
/// # Write Path
///
/// 1. Append one record to the active log through the buffered writer.
/// 2. Point the keydir entry at the offset the record started at (`put`),
///    or drop the entry (`delete`).
///
/// # Read Path
///
/// 1. Look the key up in the keydir; absent means [`StoreError::NotFound`].
/// 2. Open the file the entry names, seek to the offset, read the record,
///    return its value.
///
/// # Recovery
///
/// [`Store::open`] rebuilds the keydir from the hint files in the directory.
/// Only merged data is hint-covered: keys written after the last merge are
/// not visible to a freshly opened store.
///
/// Operations take `&mut self` and are not internally synchronized; a host
/// wrapping the store serializes access. The rotation lock excludes other
/// processes, not other threads.
pub struct Store {
    dir: PathBuf,
    pub(crate) keydir: KeyDir,
    pub(crate) active: ActiveLog,
}

impl Store {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    ///
    /// Builds the keydir from existing hint files and opens the active log
    /// for appending. A stale `compacted_data.txt` left by an interrupted
    /// merge is deleted best-effort; the merger truncates it anyway.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let stale = dir.join(MERGE_OUTPUT);
        if stale.exists() {
            if let Err(e) = fs::remove_file(&stale) {
                warn!("failed to remove stale {}: {}", MERGE_OUTPUT, e);
            }
        }

        let keydir = index::build_keydir(&dir)?;
        let active = ActiveLog::open(&dir)?;

        Ok(Self {
            dir,
            keydir,
            active,
        })
    }

    /// Directory this store operates in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of keys currently indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keydir.len()
    }

    /// Returns `true` if no key is currently indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keydir.is_empty()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("dir", &self.dir)
            .field("indexed_keys", &self.keydir.len())
            .field("active_log_len", &self.active.offset())
            .finish()
    }
}

/// Best-effort flush on drop so buffered appends reach the file. Errors are
/// ignored because `Drop` cannot propagate them.
impl Drop for Store {
    fn drop(&mut self) {
        let _ = self.active.flush();
    }
}

#[cfg(test)]
mod tests;
