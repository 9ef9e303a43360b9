//! Records Module
//!
//! The in-memory record store: an ordered mapping from key to value.
//!
//! ## Responsibilities
//! - Enforce key uniqueness (set on an existing key replaces the value)
//! - Deterministic lexicographic iteration order
//! - Efficient prefix-range scans for the query engine
//!
//! ## Data Structure Choice
//! BTreeMap<String, String>:
//! - Ordered keys make prefix queries O(log n + k) range scans instead
//!   of full-map filters
//! - A plain HashMap would force linear scans for every prefix query

mod table;

pub use table::RecordStore;

use serde::{Deserialize, Serialize};

/// One key/value pair stored by the engine.
///
/// Also the unit of the on-disk payload in file mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier within the store
    pub key: String,

    /// Opaque payload; no size constraint is enforced here
    pub value: String,
}

impl Entry {
    /// Create a new entry
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
