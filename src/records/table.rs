//! RecordStore implementation
//!
//! BTreeMap-based ordered map with single-owner access.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::ops::Bound;

use super::Entry;

/// Ordered in-memory table of records
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    data: BTreeMap<String, String>,
}

impl RecordStore {
    /// Create a new empty RecordStore
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }

    /// Build a RecordStore from a list of entries (backend load path).
    ///
    /// Later duplicates win, matching set semantics.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut data = BTreeMap::new();
        for entry in entries {
            data.insert(entry.key, entry.value);
        }
        Self { data }
    }

    /// Insert or overwrite a key. Returns the previous value if the key
    /// was already present, so the caller can roll back a failed persist.
    pub fn set(&mut self, key: String, value: String) -> Option<String> {
        self.data.insert(key, value)
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Pure lookup, no side effect
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Number of unique keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the store holds no records
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Remove one record. Returns the removed value if the key was
    /// present, for rollback.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.data.remove(key)
    }

    /// Take every record out of the store, leaving it empty.
    ///
    /// The removed map is returned so `clear_all` can be rolled back
    /// wholesale via [`restore`](Self::restore).
    pub fn take_all(&mut self) -> BTreeMap<String, String> {
        std::mem::take(&mut self.data)
    }

    /// Put back a map previously removed by [`take_all`](Self::take_all)
    pub fn restore(&mut self, data: BTreeMap<String, String>) {
        self.data = data;
    }

    /// Iterate all records in lexicographic key order
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.data.iter()
    }

    /// Range scan starting at the first key >= `prefix`.
    ///
    /// Keys are sorted, so every key matching `prefix` sits in a
    /// contiguous run at the front of this range. Callers stop at the
    /// first non-matching key.
    pub fn range_from<'a>(&'a self, prefix: &str) -> btree_map::Range<'a, String, String> {
        self.data
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
    }

    /// Materialize every record as an owned entry list, in key order
    /// (backend save path)
    pub fn to_entries(&self) -> Vec<Entry> {
        self.iter()
            .map(|(k, v)| Entry::new(k.clone(), v.clone()))
            .collect()
    }
}
