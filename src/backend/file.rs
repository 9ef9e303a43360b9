//! Single-file backend
//!
//! Owns the on-disk format and the durable write path.
//!
//! ## File Format
//!
//! ```text
//! ┌───────────┬─────────┬───────────┬──────────────────────────┐
//! │ magic (4) │ ver (1) │ crc32 (4) │ payload (bincode)        │
//! │  "KVL1"   │  0x01   │ LE, of    │ Vec<Entry>, key order    │
//! │           │         │ payload   │                          │
//! └───────────┴─────────┴───────────┴──────────────────────────┘
//! ```
//!
//! The CRC covers only the payload; magic and version are validated
//! byte-for-byte. Anything that does not match is rejected at open with
//! `StoreOpenFailed` so a foreign or corrupt file never masquerades as
//! an empty database.
//!
//! Writes go to a sibling `.tmp` file, are fsynced, then renamed over
//! the target, so a crash mid-write leaves the previous file intact.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, StoreError};
use crate::records::{Entry, RecordStore};

/// File format marker
const MAGIC: &[u8; 4] = b"KVL1";

/// Current format version
const FORMAT_VERSION: u8 = 1;

/// Magic + version + checksum
const HEADER_LEN: usize = 4 + 1 + 4;

/// Single-file durability backend
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend for the given database path (no I/O yet)
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Load the record store from disk.
    ///
    /// A missing file is a new database and yields an empty store. An
    /// existing file must pass magic, version, and checksum validation.
    pub fn load(&self) -> Result<RecordStore> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no database file, starting empty");
            return Ok(RecordStore::new());
        }

        let mut file = File::open(&self.path).map_err(|e| {
            StoreError::StoreOpenFailed(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| {
            StoreError::StoreOpenFailed(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        let entries = Self::decode(&bytes)?;
        debug!(
            path = %self.path.display(),
            entries = entries.len(),
            "loaded database file"
        );
        Ok(RecordStore::from_entries(entries))
    }

    /// Persist the full record store, atomically replacing the file
    pub fn save(&mut self, records: &RecordStore) -> Result<()> {
        let bytes = Self::encode(records)?;

        let tmp_path = self.tmp_path();
        self.write_durably(&tmp_path, &bytes).map_err(|e| {
            // Leave no stray tmp file behind on failure
            let _ = fs::remove_file(&tmp_path);
            StoreError::PersistenceFailed(format!(
                "cannot write {}: {}",
                self.path.display(),
                e
            ))
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::PersistenceFailed(format!(
                "cannot replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(path = %self.path.display(), entries = records.len(), "persisted");
        Ok(())
    }

    // =========================================================================
    // Format Encoding / Decoding
    // =========================================================================

    fn encode(records: &RecordStore) -> Result<Vec<u8>> {
        let payload = bincode::serialize(&records.to_entries())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&payload);
        let crc = hasher.finalize();

        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.push(FORMAT_VERSION);
        bytes.extend_from_slice(&crc.to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    fn decode(bytes: &[u8]) -> Result<Vec<Entry>> {
        if bytes.len() < HEADER_LEN {
            return Err(StoreError::StoreOpenFailed(
                "file too short to hold a database header".to_string(),
            ));
        }

        if &bytes[0..4] != MAGIC {
            return Err(StoreError::StoreOpenFailed(
                "bad magic: not a keylite database".to_string(),
            ));
        }

        let version = bytes[4];
        if version != FORMAT_VERSION {
            return Err(StoreError::StoreOpenFailed(format!(
                "unsupported format version {} (expected {})",
                version, FORMAT_VERSION
            )));
        }

        let stored_crc = u32::from_le_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]);
        let payload = &bytes[HEADER_LEN..];

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(payload);
        if hasher.finalize() != stored_crc {
            return Err(StoreError::StoreOpenFailed(
                "checksum mismatch: database file is corrupt".to_string(),
            ));
        }

        bincode::deserialize(payload)
            .map_err(|e| StoreError::StoreOpenFailed(format!("undecodable payload: {}", e)))
    }

    // =========================================================================
    // Durable Write Path
    // =========================================================================

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_durably(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}
