//! Keydir rebuild from hint files.
//!
//! The startup path: instead of replaying every log, the indexer reads the
//! compact hint files left by past merges. Records appended after the last
//! merge are not hint-covered and stay invisible until the next merge.

use byteorder::{BigEndian, ReadBytesExt};
use keydir::{KeyDir, Location};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::error::{Result, StoreError};
use crate::files;

/// Builds a fresh keydir from every `data_*.hint` file in `dir`, visited
/// newest first.
///
/// Each hint entry points into the log named by the hint file minus its
/// `.hint` suffix. Later insertions overwrite earlier ones, so when several
/// hint files mention the same key the oldest-visited entry wins; in the
/// steady state of at most one compacted log this never arises.
///
/// # Errors
///
/// [`StoreError::Corrupt`] if a hint file ends inside an entry (anything but
/// a clean EOF on a `key_len` boundary); [`StoreError::Io`] on read failure.
pub fn build_keydir(dir: &Path) -> Result<KeyDir> {
    let mut keydir = KeyDir::new();

    for hint in files::sorted_hints(dir)? {
        let log = files::hinted_log_name(&hint);
        let file = File::open(dir.join(&hint))?;
        let mut r = BufReader::new(file);

        loop {
            let key_len = match r.read_u32::<BigEndian>() {
                Ok(v) => v,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(StoreError::Io(e)),
            };

            let mut key = vec![0u8; key_len as usize];
            r.read_exact(&mut key).map_err(|e| partial_entry(e, &hint))?;

            let offset = r
                .read_u64::<BigEndian>()
                .map_err(|e| partial_entry(e, &hint))?;

            keydir.insert(
                key,
                Location {
                    file_id: log.clone(),
                    offset,
                },
            );
        }
    }

    Ok(keydir)
}

fn partial_entry(e: io::Error, hint: &str) -> StoreError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        StoreError::Corrupt(format!("{} ended mid-entry", hint))
    } else {
        StoreError::Io(e)
    }
}
