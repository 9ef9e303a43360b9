//! Query Engine
//!
//! Prefix-match iteration and snapshot materialization over a
//! [`RecordStore`].
//!
//! Two return contracts, deliberately distinct:
//! - **Live** iterators ([`Keys`], [`KeyValues`]): lazy, borrow the
//!   store, produce results in lexicographic key order. The borrow
//!   checker rejects mutation while one is alive, so the
//!   concurrent-modification hazard cannot occur.
//! - **Snapshots** ([`fetch_keys`], [`fetch_key_values`]): eagerly copy
//!   every match into an owned, independent sequence before returning,
//!   at O(k) extra memory. Safe to hold across later mutations.
//!
//! Prefix matching is literal string prefix only; the empty string
//! matches every key. There is no wildcard token.

use std::collections::btree_map;

use crate::records::{Entry, RecordStore};

// =============================================================================
// Live Iterators
// =============================================================================

/// Live iterator over keys matching a prefix
pub struct Keys<'a> {
    inner: btree_map::Range<'a, String, String>,
    prefix: &'a str,
    done: bool,
}

/// Live iterator over (key, value) pairs matching a prefix
pub struct KeyValues<'a> {
    inner: btree_map::Range<'a, String, String>,
    prefix: &'a str,
    done: bool,
}

impl<'a> Keys<'a> {
    pub(crate) fn new(store: &'a RecordStore, prefix: &'a str) -> Self {
        Self {
            inner: store.range_from(prefix),
            prefix,
            done: false,
        }
    }
}

impl<'a> KeyValues<'a> {
    pub(crate) fn new(store: &'a RecordStore, prefix: &'a str) -> Self {
        Self {
            inner: store.range_from(prefix),
            prefix,
            done: false,
        }
    }
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.next() {
            Some((key, _)) if key.starts_with(self.prefix) => Some(key),
            // Keys are sorted: the first miss ends the matching run
            _ => {
                self.done = true;
                None
            }
        }
    }
}

impl<'a> Iterator for KeyValues<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.next() {
            Some((key, value)) if key.starts_with(self.prefix) => {
                Some((key.as_str(), value.as_str()))
            }
            _ => {
                self.done = true;
                None
            }
        }
    }
}

// =============================================================================
// Materialized Snapshots
// =============================================================================

/// Copy every key matching `prefix` into an owned list
pub fn fetch_keys(store: &RecordStore, prefix: &str) -> Vec<String> {
    Keys::new(store, prefix).map(str::to_string).collect()
}

/// Copy every (key, value) pair matching `prefix` into an owned list
pub fn fetch_key_values(store: &RecordStore, prefix: &str) -> Vec<Entry> {
    KeyValues::new(store, prefix)
        .map(|(k, v)| Entry::new(k, v))
        .collect()
}
