use std::collections::hash_map;
use std::collections::HashMap;

/// Location points at the newest on-disk record for a key: the name of the
/// log file containing it and the byte offset of the record's first byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file_id: String,
    pub offset: u64,
}

/// In-memory index from key bytes to the [`Location`] of the latest record.
///
/// Keys are compared by exact byte identity and are unique; insertion order
/// is immaterial. The keydir holds no file handles and performs no I/O.
#[derive(Debug, Default)]
pub struct KeyDir {
    map: HashMap<Vec<u8>, Location>,
}

impl KeyDir {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Points `key` at `location`, replacing any previous entry.
    pub fn insert(&mut self, key: Vec<u8>, location: Location) {
        self.map.insert(key, location);
    }

    pub fn get(&self, key: &[u8]) -> Option<&Location> {
        self.map.get(key)
    }

    /// Removes the entry for `key`, if any.
    pub fn remove(&mut self, key: &[u8]) -> Option<Location> {
        self.map.remove(key)
    }

    /// Discards every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Replaces the entire contents with `other`. Used after a merge, when
    /// the keydir is rebuilt from the surviving hint files.
    pub fn replace(&mut self, other: KeyDir) {
        self.map = other.map;
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Vec<u8>, Location> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.map.contains_key(key)
    }
}
