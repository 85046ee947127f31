//! Rotation: seal the active log and, at the threshold, run a merge cycle.
//!
//! The rename of `data.txt` to its sealed name is the commit point. Anything
//! that fails before it leaves the store untouched; anything after it leaves
//! the directory partially advanced and the error is surfaced.

use fs2::FileExt;
use std::fs::{self, OpenOptions};
use tracing::{info, warn};

use crate::active::ActiveLog;
use crate::error::Result;
use crate::files::{self, ACTIVE_LOG, LOCK_FILE, MAX_IMMUTABLES, MERGE_OUTPUT};
use crate::{hint, index, merge, Store};

impl Store {
    /// Seals the active log into `data_<ts>.log` and opens a fresh one.
    ///
    /// If the directory then holds at least [`MAX_IMMUTABLES`] sealed logs
    /// (compacted logs from earlier cycles included), they are merged into a
    /// single compacted log, a hint file is written for it, the consumed
    /// logs and superseded hints are deleted, and the keydir is rebuilt from
    /// the surviving hints.
    ///
    /// An exclusive advisory lock on `data.txt.lock` is held for the whole
    /// window to exclude other processes operating on the directory. A
    /// failed rebuild of the keydir is surfaced, not swallowed: the on-disk
    /// state has advanced and the in-memory index no longer matches it.
    pub fn rotate(&mut self) -> Result<()> {
        self.active.flush()?;

        let lock = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(self.dir().join(LOCK_FILE))?;
        lock.lock_exclusive()?;

        let outcome = self.rotate_locked();
        if let Err(e) = FileExt::unlock(&lock) {
            warn!("failed to release {}: {}", LOCK_FILE, e);
        }
        outcome
    }

    fn rotate_locked(&mut self) -> Result<()> {
        info!("rotation started");

        let sealed = files::free_sealed_name(self.dir(), files::now_unix_seconds()?);
        fs::rename(self.dir().join(ACTIVE_LOG), self.dir().join(&sealed))?;
        info!("sealed active log as {}", sealed);

        self.active = ActiveLog::open(self.dir())?;

        let logs = files::sorted_logs(self.dir())?;
        if logs.len() < MAX_IMMUTABLES {
            info!(
                "no merge needed: {} logs, threshold {}",
                logs.len(),
                MAX_IMMUTABLES
            );
            return Ok(());
        }

        merge::merge_logs(self.dir(), &logs)?;

        let compacted = files::free_compacted_name(self.dir(), files::now_unix_seconds()?);
        fs::rename(self.dir().join(MERGE_OUTPUT), self.dir().join(&compacted))?;

        hint::create_hint_file(self.dir(), &compacted)?;
        info!("hint file written for {}", compacted);

        self.cleanup_stale(&logs, &compacted);

        let fresh = index::build_keydir(self.dir())?;
        self.keydir.replace(fresh);

        info!("rotation complete: {} keys indexed", self.keydir.len());
        Ok(())
    }

    /// Deletes the merge inputs and every hint superseded by `compacted`.
    /// Failures are logged and ignored; a leftover is swept by a later cycle.
    fn cleanup_stale(&self, consumed_logs: &[String], compacted: &str) {
        for old in consumed_logs {
            if old != compacted {
                if let Err(e) = fs::remove_file(self.dir().join(old)) {
                    warn!("failed to delete stale log {}: {}", old, e);
                }
            }
        }

        let current_hint = files::hint_name(compacted);
        match files::sorted_hints(self.dir()) {
            Ok(hints) => {
                for old in hints {
                    if old != current_hint {
                        if let Err(e) = fs::remove_file(self.dir().join(&old)) {
                            warn!("failed to delete stale hint {}: {}", old, e);
                        }
                    }
                }
            }
            Err(e) => warn!("failed to list stale hints: {}", e),
        }
    }
}
