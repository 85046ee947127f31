//! File naming and ordering for the store directory.
//!
//! Every file the engine touches lives directly in the store directory:
//!
//! ```text
//! data.txt                                active log (appendable)
//! data.txt.lock                           advisory lock held during rotation
//! data_<unix_seconds>.log                 sealed immutable log
//! data_compacted_<unix_seconds>.log       merge output (only live records)
//! data_compacted_<unix_seconds>.log.hint  index over one compacted log
//! compacted_data.txt                      transient merge output, renamed on success
//! ```

use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fixed name of the active log.
pub const ACTIVE_LOG: &str = "data.txt";

/// Lock file taken exclusively for the rotation window.
pub const LOCK_FILE: &str = "data.txt.lock";

/// Transient output of the merger, renamed into place on success.
pub const MERGE_OUTPUT: &str = "compacted_data.txt";

/// Number of `data_*.log` files that triggers a merge during rotation.
pub const MAX_IMMUTABLES: usize = 3;

/// Current wall clock in whole seconds since the Unix epoch.
pub(crate) fn now_unix_seconds() -> io::Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// Extracts the timestamp embedded in a sealed-log filename.
///
/// Only `data_<digits>...` parses; a compacted log (`data_compacted_<ts>.log`)
/// or any other name yields 0 and therefore sorts as the oldest input. That
/// ordering is intended: compacted content is never newer than any log sealed
/// after it.
pub(crate) fn log_timestamp(name: &str) -> u64 {
    let rest = match name.strip_prefix("data_") {
        Some(r) => r,
        None => return 0,
    };
    let end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    rest[..end].parse().unwrap_or(0)
}

/// Lists the filenames in `dir` with prefix `data_` and the given suffix,
/// sorted newest first by embedded timestamp. Ties break on the name itself
/// so the order is deterministic.
fn sorted_data_files(dir: &Path, suffix: &str) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|n| n.starts_with("data_") && n.ends_with(suffix))
        .collect();

    names.sort_by(|a, b| {
        log_timestamp(b)
            .cmp(&log_timestamp(a))
            .then_with(|| b.cmp(a))
    });
    Ok(names)
}

/// All sealed logs (`data_*.log`), newest first. Includes compacted logs,
/// which sort last; they participate as inputs to the next merge cycle.
pub(crate) fn sorted_logs(dir: &Path) -> io::Result<Vec<String>> {
    sorted_data_files(dir, ".log")
}

/// All hint files (`data_*.hint`), newest first.
pub(crate) fn sorted_hints(dir: &Path) -> io::Result<Vec<String>> {
    sorted_data_files(dir, ".hint")
}

/// Picks a free `data_<ts>.log` name starting from `ts`.
///
/// Two rotations inside the same second would otherwise rename the active
/// log onto an existing sealed log and destroy it, so the timestamp is
/// bumped until the name is unused.
pub(crate) fn free_sealed_name(dir: &Path, mut ts: u64) -> String {
    loop {
        let name = format!("data_{}.log", ts);
        if !dir.join(&name).exists() {
            return name;
        }
        ts += 1;
    }
}

/// Picks a free `data_compacted_<ts>.log` name starting from `ts`.
pub(crate) fn free_compacted_name(dir: &Path, mut ts: u64) -> String {
    loop {
        let name = format!("data_compacted_{}.log", ts);
        if !dir.join(&name).exists() {
            return name;
        }
        ts += 1;
    }
}

/// `<log>.hint` for a compacted log name.
pub(crate) fn hint_name(compacted_log: &str) -> String {
    format!("{}.hint", compacted_log)
}

/// Derives the log a hint file indexes by stripping the `.hint` suffix.
pub(crate) fn hinted_log_name(hint: &str) -> String {
    hint.strip_suffix(".hint").unwrap_or(hint).to_string()
}
