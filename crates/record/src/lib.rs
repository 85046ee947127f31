//! # Record — On-Disk Log Record Codec
//!
//! The binary record format shared by every log file in the EmberKV storage
//! engine: the active log, sealed immutable logs, and compacted logs all
//! contain back-to-back records in this encoding, with no framing, padding,
//! or alignment between them.
//!
//! ## Binary Record Format
//!
//! ```text
//! [flag: u8][key_len: u32 BE][val_len: u32 BE][key][val]
//! ```
//!
//! `flag` is `0` for a normal key-value record and `1` for a tombstone. A
//! tombstone still carries `val_len` (always zero) but no value bytes, so
//! its total size is `9 + key_len`.
//!
//! ## Example
//!
//! ```rust
//! use record::{Record, write_put};
//! use std::io::Cursor;
//!
//! let mut buf = Vec::new();
//! write_put(&mut buf, b"hello", b"world").unwrap();
//!
//! let mut r = Cursor::new(buf);
//! let rec = Record::read_from(&mut r).unwrap().unwrap();
//! assert_eq!(rec.key(), b"hello");
//! ```

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use thiserror::Error;

/// Flag byte for a normal key-value record.
pub const FLAG_NORMAL: u8 = 0;
/// Flag byte for a tombstone (delete marker).
pub const FLAG_TOMBSTONE: u8 = 1;

/// Fixed bytes preceding the key in every record: flag + key_len + val_len.
pub const HEADER_LEN: u64 = 1 + 4 + 4;

/// A single log record: either a key-value insertion or a deletion marker.
///
/// The tombstone case carries no value at all, making the "deletes have no
/// payload" contract structural rather than a runtime check on `val_len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// A key-value insertion.
    Put {
        /// The lookup key.
        key: Vec<u8>,
        /// The payload value.
        value: Vec<u8>,
    },
    /// A key deletion. Eliminated by compaction.
    Tombstone {
        /// The key to delete.
        key: Vec<u8>,
    },
}

/// Errors that can occur while encoding or decoding records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// An underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The source ended in the middle of a record, or the flag byte was not
    /// a known value.
    #[error("corrupt record")]
    Corrupt,
}

/// The fixed-size prefix of a record, decoded without touching the key or
/// value bytes.
///
/// Scans that do not need every payload (the merger stepping over records
/// whose key is already resolved, the hinter collecting offsets) read the
/// header, then the key, then either read or skip `val_len` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// `FLAG_NORMAL` or `FLAG_TOMBSTONE`.
    pub flag: u8,
    /// Length of the key in bytes.
    pub key_len: u32,
    /// Length of the value in bytes. Always zero for tombstones.
    pub val_len: u32,
}

impl RecordHeader {
    /// Returns `true` if this header belongs to a tombstone record.
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        self.flag == FLAG_TOMBSTONE
    }
}

/// Writes a normal record (`flag=0`) for `key`/`value` to `w`.
///
/// Does not flush. Returns the record verbatim as it will appear on disk:
/// flag, key_len, val_len, key bytes, value bytes.
///
/// # Errors
///
/// `RecordError::Io` with `ErrorKind::InvalidInput` if the key or value
/// exceeds `u32::MAX` bytes, or any error from the sink.
pub fn write_put<W: Write>(w: &mut W, key: &[u8], value: &[u8]) -> Result<(), RecordError> {
    let key_len = len_u32(key)?;
    let val_len = len_u32(value)?;
    w.write_u8(FLAG_NORMAL)?;
    w.write_u32::<BigEndian>(key_len)?;
    w.write_u32::<BigEndian>(val_len)?;
    w.write_all(key)?;
    w.write_all(value)?;
    Ok(())
}

/// Writes a tombstone record (`flag=1`, `val_len=0`) for `key` to `w`.
///
/// Does not flush.
pub fn write_tombstone<W: Write>(w: &mut W, key: &[u8]) -> Result<(), RecordError> {
    let key_len = len_u32(key)?;
    w.write_u8(FLAG_TOMBSTONE)?;
    w.write_u32::<BigEndian>(key_len)?;
    w.write_u32::<BigEndian>(0)?;
    w.write_all(key)?;
    Ok(())
}

/// Returns the on-disk size of a normal record for `key`/`value`.
#[must_use]
pub fn put_len(key: &[u8], value: &[u8]) -> u64 {
    HEADER_LEN + key.len() as u64 + value.len() as u64
}

/// Returns the on-disk size of a tombstone record for `key`.
#[must_use]
pub fn tombstone_len(key: &[u8]) -> u64 {
    HEADER_LEN + key.len() as u64
}

/// Reads the fixed-size record header from `r`.
///
/// # Termination
///
/// - **Clean EOF** (no bytes before the flag) -> `Ok(None)`; the previous
///   record was the last one.
/// - **EOF inside the header** -> `Err(RecordError::Corrupt)`.
/// - **Unknown flag byte** -> `Err(RecordError::Corrupt)`.
pub fn read_header<R: Read>(r: &mut R) -> Result<Option<RecordHeader>, RecordError> {
    let flag = match r.read_u8() {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(RecordError::Io(e)),
    };
    if flag != FLAG_NORMAL && flag != FLAG_TOMBSTONE {
        return Err(RecordError::Corrupt);
    }
    let key_len = read_u32_mid(r)?;
    let val_len = read_u32_mid(r)?;
    Ok(Some(RecordHeader {
        flag,
        key_len,
        val_len,
    }))
}

impl Record {
    /// Returns the record's key.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        match self {
            Record::Put { key, .. } => key,
            Record::Tombstone { key } => key,
        }
    }

    /// Returns the on-disk size of this record.
    #[must_use]
    pub fn encoded_len(&self) -> u64 {
        match self {
            Record::Put { key, value } => put_len(key, value),
            Record::Tombstone { key } => tombstone_len(key),
        }
    }

    /// Serializes this record to `w`. Does not flush.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), RecordError> {
        match self {
            Record::Put { key, value } => write_put(w, key, value),
            Record::Tombstone { key } => write_tombstone(w, key),
        }
    }

    /// Reads one complete record from `r`.
    ///
    /// Returns `Ok(None)` on a clean end-of-file between records. An
    /// end-of-file anywhere inside a record is `RecordError::Corrupt`.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Option<Record>, RecordError> {
        let header = match read_header(r)? {
            Some(h) => h,
            None => return Ok(None),
        };

        let mut key = vec![0u8; header.key_len as usize];
        read_exact_mid(r, &mut key)?;

        if header.is_tombstone() {
            return Ok(Some(Record::Tombstone { key }));
        }

        let mut value = vec![0u8; header.val_len as usize];
        read_exact_mid(r, &mut value)?;
        Ok(Some(Record::Put { key, value }))
    }
}

fn len_u32(bytes: &[u8]) -> Result<u32, RecordError> {
    u32::try_from(bytes.len()).map_err(|_| {
        RecordError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "record field too large (exceeds u32::MAX bytes)",
        ))
    })
}

/// `read_u32` that converts an EOF mid-record into `Corrupt`.
fn read_u32_mid<R: Read>(r: &mut R) -> Result<u32, RecordError> {
    match r.read_u32::<BigEndian>() {
        Ok(v) => Ok(v),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(RecordError::Corrupt),
        Err(e) => Err(RecordError::Io(e)),
    }
}

/// `read_exact` that converts an EOF mid-record into `Corrupt`.
fn read_exact_mid<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<(), RecordError> {
    match r.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(RecordError::Corrupt),
        Err(e) => Err(RecordError::Io(e)),
    }
}
