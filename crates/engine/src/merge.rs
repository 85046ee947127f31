//! Newest-wins compaction of sealed logs.
//!
//! The merger reduces any number of sealed logs to the single latest state
//! per key: one normal record for every live key, nothing at all for keys
//! whose latest record is a tombstone.

use record::{read_header, write_put, RecordError};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::info;

use crate::error::{Result, StoreError};
use crate::files::MERGE_OUTPUT;

/// The surviving state of one key during a merge: the latest value, or
/// `None` when the latest record is a tombstone.
type Survivors = HashMap<Vec<u8>, Option<Vec<u8>>>;

/// Merges `logs` (newest first, as produced by the rotator's listing) into
/// `compacted_data.txt` inside `dir`.
///
/// Resolution is newest-wins: the first log to mention a key settles it, and
/// within one log the last record for a key is its latest. A key settled by
/// a newer log causes older records' value bytes to be skipped unread.
/// Tombstoned keys are dropped entirely — the output contains only normal
/// records.
///
/// The output file is truncated before writing, so a leftover from an
/// interrupted merge cannot leak stale records. The caller renames the
/// output into place; the merge itself is not atomic.
pub fn merge_logs(dir: &Path, logs: &[String]) -> Result<()> {
    info!("merging {} logs", logs.len());

    let mut survivors = Survivors::new();
    for name in logs {
        scan_log(dir, name, &mut survivors)?;
    }

    let out = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(dir.join(MERGE_OUTPUT))?;
    let mut w = BufWriter::new(out);

    let mut live = 0usize;
    for (key, state) in &survivors {
        if let Some(value) = state {
            write_put(&mut w, key, value)?;
            live += 1;
        }
    }
    w.flush()?;

    info!("merge complete: {} live keys of {} seen", live, survivors.len());
    Ok(())
}

/// Scans one log front to back, folding its records into `survivors`.
///
/// Records whose key is already settled by a newer log are stepped over
/// without materializing the value. Unsettled keys collect into a per-log
/// map where later records overwrite earlier ones — within a single log,
/// append order is chronological.
fn scan_log(dir: &Path, name: &str, survivors: &mut Survivors) -> Result<()> {
    let file = File::open(dir.join(name))
        .map_err(|e| StoreError::Io(io::Error::new(e.kind(), format!("open {}: {}", name, e))))?;
    let mut r = BufReader::new(file);

    let mut latest: Survivors = Survivors::new();
    loop {
        let header = match read_header(&mut r) {
            Ok(Some(h)) => h,
            Ok(None) => break,
            Err(RecordError::Corrupt) => {
                return Err(StoreError::Corrupt(format!("{} ended mid-record", name)))
            }
            Err(e) => return Err(e.into()),
        };

        let mut key = vec![0u8; header.key_len as usize];
        read_exact_in(&mut r, &mut key, name)?;

        if survivors.contains_key(&key) {
            skip_value(&mut r, u64::from(header.val_len), name)?;
            continue;
        }

        if header.is_tombstone() {
            latest.insert(key, None);
        } else {
            let mut value = vec![0u8; header.val_len as usize];
            read_exact_in(&mut r, &mut value, name)?;
            latest.insert(key, Some(value));
        }
    }

    // Keys in `latest` were all unsettled when scanned, so this never
    // overwrites an entry from a newer log.
    survivors.extend(latest);
    Ok(())
}

fn read_exact_in<R: Read>(r: &mut R, buf: &mut [u8], name: &str) -> Result<()> {
    r.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            StoreError::Corrupt(format!("{} ended mid-record", name))
        } else {
            StoreError::Io(e)
        }
    })
}

/// Steps over `len` value bytes without allocating for them.
fn skip_value<R: Read>(r: &mut R, len: u64, name: &str) -> Result<()> {
    let copied = io::copy(&mut r.take(len), &mut io::sink())?;
    if copied != len {
        return Err(StoreError::Corrupt(format!("{} ended mid-record", name)));
    }
    Ok(())
}
