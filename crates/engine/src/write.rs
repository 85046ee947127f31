//! Write path: `put()` and `delete()`.
//!
//! Every mutation appends exactly one record to the active log and then
//! adjusts the keydir. The keydir is only touched after the append succeeds,
//! so a failed write leaves the index pointing at the previous record.

use keydir::Location;

use crate::error::Result;
use crate::files::ACTIVE_LOG;
use crate::Store;

impl Store {
    /// Inserts or overwrites a key.
    ///
    /// Appends one normal record and points the keydir entry at the offset
    /// the record started at. The write may still sit in the append buffer
    /// when this returns; `get` flushes before reading the active log.
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        let offset = self.active.append_put(&key, &value)?;
        self.keydir.insert(
            key,
            Location {
                file_id: ACTIVE_LOG.to_string(),
                offset,
            },
        );
        Ok(())
    }

    /// Deletes a key by appending a tombstone and dropping the keydir entry.
    ///
    /// Deleting an absent key still appends a tombstone; the merge cycle
    /// needs it to shadow any older record for the key in sealed logs.
    pub fn delete(&mut self, key: Vec<u8>) -> Result<()> {
        self.active.append_delete(&key)?;
        self.keydir.remove(&key);
        Ok(())
    }
}
