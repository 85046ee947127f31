//! Hint files: a compact offset index over one compacted log.
//!
//! ## Hint Entry Format
//!
//! ```text
//! [key_len: u32 BE][key][offset: u64 BE]
//! ```
//!
//! `offset` is the byte position of the record's first byte in the sibling
//! compacted log. No flag and no value length are stored — a hinted record
//! is always normal, and its value length is recovered by reading the log.

use byteorder::{BigEndian, WriteBytesExt};
use record::{read_header, RecordError};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{Result, StoreError};
use crate::files::hint_name;

/// Scans `compacted_log` (a filename inside `dir`) and writes its sibling
/// `<log>.hint` file mapping every key to the offset its record starts at.
///
/// The merger guarantees each key appears once; if the input breaks that,
/// the last-scanned offset wins.
///
/// # Errors
///
/// [`StoreError::Corrupt`] if the log contains a tombstone (compacted logs
/// must hold only live records) or ends mid-record; [`StoreError::Io`]
/// otherwise.
pub fn create_hint_file(dir: &Path, compacted_log: &str) -> Result<()> {
    let mut log = File::open(dir.join(compacted_log))?;

    let mut offsets: HashMap<Vec<u8>, u64> = HashMap::new();
    loop {
        let off = log.stream_position()?;

        let header = match read_header(&mut log) {
            Ok(Some(h)) => h,
            Ok(None) => break,
            Err(RecordError::Corrupt) => {
                return Err(StoreError::Corrupt(format!(
                    "{} ended mid-record at offset {}",
                    compacted_log, off
                )))
            }
            Err(e) => return Err(e.into()),
        };

        if header.is_tombstone() {
            return Err(StoreError::Corrupt(format!(
                "tombstone in compacted log {} at offset {}",
                compacted_log, off
            )));
        }

        let mut key = vec![0u8; header.key_len as usize];
        log.read_exact(&mut key).map_err(|e| mid_record(e, compacted_log))?;
        offsets.insert(key, off);

        // Step over the value to the next record.
        log.seek(SeekFrom::Current(i64::from(header.val_len)))?;
    }

    let hint = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(dir.join(hint_name(compacted_log)))?;
    let mut w = BufWriter::new(hint);

    for (key, offset) in &offsets {
        w.write_u32::<BigEndian>(key.len() as u32)?;
        w.write_all(key)?;
        w.write_u64::<BigEndian>(*offset)?;
    }
    w.flush()?;
    Ok(())
}

fn mid_record(e: io::Error, name: &str) -> StoreError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        StoreError::Corrupt(format!("{} ended mid-record", name))
    } else {
        StoreError::Io(e)
    }
}
