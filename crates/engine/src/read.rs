//! Read path: `get()`.
//!
//! A lookup is one keydir probe plus one file open, seek, and read. The
//! reader trusts the keydir: it does not compare the on-disk key against the
//! requested one.

use byteorder::{BigEndian, ReadBytesExt};
use record::FLAG_TOMBSTONE;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use crate::error::{Result, StoreError};
use crate::files::ACTIVE_LOG;
use crate::Store;

impl Store {
    /// Returns the value of the newest record for `key`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the key is absent from the keydir.
    /// - [`StoreError::Deleted`] if the entry resolves to a tombstone on
    ///   disk (defensive; a maintained keydir never points at one).
    /// - [`StoreError::Io`] on any open, seek, or read failure.
    pub fn get(&mut self, key: &[u8]) -> Result<Vec<u8>> {
        let location = match self.keydir.get(key) {
            Some(l) => l.clone(),
            None => return Err(StoreError::NotFound),
        };

        // Appends may still be buffered; reads at a recorded offset need
        // the bytes on disk.
        if location.file_id == ACTIVE_LOG {
            self.active.flush()?;
        }

        let mut file = File::open(self.dir().join(&location.file_id))?;
        file.seek(SeekFrom::Start(location.offset))?;

        let flag = file.read_u8()?;
        if flag == FLAG_TOMBSTONE {
            return Err(StoreError::Deleted);
        }

        let key_len = file.read_u32::<BigEndian>()?;
        let val_len = file.read_u32::<BigEndian>()?;

        file.seek(SeekFrom::Current(i64::from(key_len)))?;

        let mut value = vec![0u8; val_len as usize];
        file.read_exact(&mut value)?;
        Ok(value)
    }
}
