//! Persistence Backend
//!
//! Polymorphic durability strategy behind the store façade, expressed as
//! a tagged variant with two implementations sharing one contract:
//! load at open, persist after every mutation, release at close.
//!
//! ## Variants
//! - `Memory`: no durability; close discards everything
//! - `File`: single-file durability; a mutation is on disk before the
//!   call that made it returns

mod file;

pub use file::FileBackend;

use std::path::Path;

use crate::error::Result;
use crate::records::RecordStore;

/// Durability strategy selected at initialization
#[derive(Debug)]
pub enum Backend {
    /// Session-lifetime data only
    Memory,

    /// Single-file durability
    File(FileBackend),
}

impl Backend {
    /// Construct the in-memory backend with an empty store
    pub fn memory() -> (Self, RecordStore) {
        (Backend::Memory, RecordStore::new())
    }

    /// Construct the file backend, loading the store from `path` if the
    /// file exists.
    ///
    /// A missing file means a new database; an unreadable or
    /// format-invalid file signals `StoreOpenFailed` rather than
    /// silently producing an empty store.
    pub fn file(path: &Path) -> Result<(Self, RecordStore)> {
        let backend = FileBackend::new(path);
        let records = backend.load()?;
        Ok((Backend::File(backend), records))
    }

    /// Make the current state of `records` durable.
    ///
    /// No-op for the memory backend. For the file backend a failure maps
    /// to `PersistenceFailed`; the caller owns rolling back the
    /// in-memory mutation.
    pub fn persist(&mut self, records: &RecordStore) -> Result<()> {
        match self {
            Backend::Memory => Ok(()),
            Backend::File(file) => file.save(records),
        }
    }

    /// Flush and release the backing resource
    pub fn close(&mut self, records: &RecordStore) -> Result<()> {
        match self {
            Backend::Memory => Ok(()),
            Backend::File(file) => file.save(records),
        }
    }
}
