//! Buffered append handle over the active log (`data.txt`).

use record::{put_len, tombstone_len, write_put, write_tombstone};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::files::ACTIVE_LOG;

/// Append-only writer for the active log.
///
/// Each append returns the byte offset at which the record *starts*, taken
/// from the file position before the write; the caller uses it to update the
/// keydir. Writes land in an in-process buffer — callers flush explicitly
/// before reading from `data.txt` at a recorded offset and before rotation.
pub(crate) struct ActiveLog {
    w: BufWriter<File>,
    /// File length plus buffered bytes: the offset the next record starts at.
    offset: u64,
}

impl ActiveLog {
    /// Opens (or creates) `data.txt` in `dir` for appending.
    pub(crate) fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(ACTIVE_LOG);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let offset = file.metadata()?.len();
        Ok(Self {
            w: BufWriter::new(file),
            offset,
        })
    }

    /// Appends a normal record, returning the offset of its first byte.
    pub(crate) fn append_put(&mut self, key: &[u8], value: &[u8]) -> Result<u64> {
        let start = self.offset;
        write_put(&mut self.w, key, value)?;
        self.offset += put_len(key, value);
        Ok(start)
    }

    /// Appends a tombstone, returning the offset of its first byte.
    pub(crate) fn append_delete(&mut self, key: &[u8]) -> Result<u64> {
        let start = self.offset;
        write_tombstone(&mut self.w, key)?;
        self.offset += tombstone_len(key);
        Ok(start)
    }

    /// Pushes all buffered bytes down to the file.
    pub(crate) fn flush(&mut self) -> Result<()> {
        self.w.flush()?;
        Ok(())
    }

    /// Offset the next record would start at (current logical length).
    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }
}
