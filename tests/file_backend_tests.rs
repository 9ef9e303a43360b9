//! Tests for the single-file backend
//!
//! These tests verify:
//! - Round-trip durability (close and reopen)
//! - Synchronous persistence of every mutation
//! - Format validation at open (magic, version, checksum)
//! - In-memory rollback when a durable write fails

use std::fs;
use std::path::Path;

use keylite::{Config, KeyValueStore, StoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn open_file_store(path: &Path) -> KeyValueStore {
    let config = Config::builder().file_path(path).build().unwrap();
    let mut store = KeyValueStore::initialize(config);
    store.open().unwrap();
    store
}

fn try_open_file_store(path: &Path) -> Result<KeyValueStore, StoreError> {
    let config = Config::builder().file_path(path).build()?;
    let mut store = KeyValueStore::initialize(config);
    store.open()?;
    Ok(store)
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_missing_file_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_file_store(&temp_dir.path().join("new.db"));

    assert_eq!(store.key_count().unwrap(), 0);
}

#[test]
fn test_close_and_reopen_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("store.db");

    let mut store = open_file_store(&db_path);
    for idx in 0..25 {
        store
            .set(format!("Key/{}", idx), format!("Data Item for Key/{}", idx))
            .unwrap();
    }
    store.close().unwrap();

    let reopened = open_file_store(&db_path);
    assert_eq!(reopened.key_count().unwrap(), 25);
    for idx in 0..25 {
        assert_eq!(
            reopened.get(&format!("Key/{}", idx)).unwrap(),
            Some(format!("Data Item for Key/{}", idx))
        );
    }
}

#[test]
fn test_every_mutation_is_durable_before_returning() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("store.db");

    let mut store = open_file_store(&db_path);
    store.set("k", "v").unwrap();

    // A second session over the same file sees the write even though the
    // first was never closed
    let observer = open_file_store(&db_path);
    assert_eq!(observer.get("k").unwrap(), Some("v".to_string()));
}

#[test]
fn test_clear_and_clear_all_persist() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("store.db");

    let mut store = open_file_store(&db_path);
    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    store.clear("a").unwrap();
    store.close().unwrap();

    let mut store = open_file_store(&db_path);
    assert_eq!(store.key_count().unwrap(), 1);
    assert!(!store.key_exists("a").unwrap());

    store.clear_all().unwrap();
    store.close().unwrap();

    let store = open_file_store(&db_path);
    assert_eq!(store.key_count().unwrap(), 0);
}

#[test]
fn test_drop_without_close_still_flushes() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("store.db");

    {
        let mut store = open_file_store(&db_path);
        store.set("k", "v").unwrap();
        // Scope exit drops the store without an explicit close
    }

    let store = open_file_store(&db_path);
    assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
}

// =============================================================================
// Format Validation Tests
// =============================================================================

#[test]
fn test_reject_file_with_bad_magic() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("not_a_db.db");
    fs::write(&db_path, b"this is not a keylite database file").unwrap();

    let result = try_open_file_store(&db_path);
    assert!(matches!(result, Err(StoreError::StoreOpenFailed(_))));
}

#[test]
fn test_reject_truncated_file() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("short.db");
    fs::write(&db_path, b"KVL").unwrap();

    let result = try_open_file_store(&db_path);
    assert!(matches!(result, Err(StoreError::StoreOpenFailed(_))));
}

#[test]
fn test_reject_unsupported_format_version() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("store.db");

    let mut store = open_file_store(&db_path);
    store.set("k", "v").unwrap();
    store.close().unwrap();

    // Bump the version byte past what the format supports
    let mut bytes = fs::read(&db_path).unwrap();
    bytes[4] = 0xFF;
    fs::write(&db_path, &bytes).unwrap();

    let result = try_open_file_store(&db_path);
    assert!(matches!(result, Err(StoreError::StoreOpenFailed(_))));
}

#[test]
fn test_reject_corrupted_payload() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("store.db");

    let mut store = open_file_store(&db_path);
    store.set("k", "v").unwrap();
    store.close().unwrap();

    // Flip one payload byte; the checksum no longer matches
    let mut bytes = fs::read(&db_path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(&db_path, &bytes).unwrap();

    let result = try_open_file_store(&db_path);
    assert!(matches!(result, Err(StoreError::StoreOpenFailed(_))));
}

// =============================================================================
// Rollback Tests
// =============================================================================

#[test]
fn test_failed_persist_rolls_back_set() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("store.db");

    let mut store = open_file_store(&db_path);
    store.set("a", "1").unwrap();

    // Removing the directory makes every further durable write fail
    fs::remove_dir_all(temp_dir.path()).unwrap();

    let result = store.set("b", "2");
    assert!(matches!(result, Err(StoreError::PersistenceFailed(_))));

    // The failed insert is gone; the earlier record is intact
    assert!(!store.key_exists("b").unwrap());
    assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
    assert_eq!(store.key_count().unwrap(), 1);
}

#[test]
fn test_failed_persist_rolls_back_overwrite_and_clear_all() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("store.db");

    let mut store = open_file_store(&db_path);
    store.set("a", "original").unwrap();

    fs::remove_dir_all(temp_dir.path()).unwrap();

    assert!(matches!(
        store.set("a", "overwritten"),
        Err(StoreError::PersistenceFailed(_))
    ));
    assert_eq!(store.get("a").unwrap(), Some("original".to_string()));

    assert!(matches!(
        store.clear_all(),
        Err(StoreError::PersistenceFailed(_))
    ));
    assert_eq!(store.key_count().unwrap(), 1);
}
