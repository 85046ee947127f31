use record::RecordError;
use std::io;
use thiserror::Error;

/// Errors surfaced by store operations.
///
/// `NotFound` and `Deleted` are ordinary lookup outcomes rather than faults;
/// they are modelled as errors so that `get` can return the value directly on
/// the happy path.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failure of a file open, read, write, seek, rename, remove, flush, or
    /// lock acquisition.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A well-formed read was expected but the file ended mid-record, or a
    /// file's contents violate a structural invariant (e.g. a tombstone
    /// inside a compacted log).
    #[error("corrupt data: {0}")]
    Corrupt(String),

    /// The key is absent from the keydir.
    #[error("key not found")]
    NotFound,

    /// The keydir entry resolved to a tombstone on disk. A correctly
    /// maintained keydir never points at one; this is the defensive outcome.
    #[error("key was deleted")]
    Deleted,
}

impl From<RecordError> for StoreError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::Io(io) => StoreError::Io(io),
            RecordError::Corrupt => StoreError::Corrupt("log ended mid-record".to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
