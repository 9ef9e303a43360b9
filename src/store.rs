//! Store Façade
//!
//! The host-facing `KeyValueStore`: lifecycle state machine, failure
//! policy enforcement, and routing of mutations through the persistence
//! backend.
//!
//! ## Lifecycle
//!
//! ```text
//! Initialized --open()--> Open --close() / drop--> Closed
//! ```
//!
//! `initialize` takes a validated [`Config`]; `open` constructs the
//! backend variant the config selects and loads the record store.
//! Every operation other than `open`/`close` is valid only in the Open
//! state and signals `InvalidState` elsewhere. Closed is terminal.
//!
//! ## Durability Contract
//!
//! Mutations apply to the in-memory record store first, then persist
//! through the backend. If the persist fails the single mutation is
//! rolled back before the error is returned, so the in-memory and
//! on-disk state never disagree after a completed call.
//!
//! ## Ownership
//!
//! One thread owns the store; there is no internal locking. `Drop`
//! releases the backend on every exit path, including early returns
//! during setup.

use std::mem;

use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::config::{Config, Mode};
use crate::error::{Result, StoreError};
use crate::query::{self, Keys, KeyValues};
use crate::records::{Entry, RecordStore};

/// One opened, operable instance: the record store plus its backend
struct Session {
    records: RecordStore,
    backend: Backend,
}

/// Lifecycle state of the façade
enum State {
    Initialized,
    Open(Session),
    Closed,
}

/// The embedded key-value store
pub struct KeyValueStore {
    config: Config,
    state: State,
}

impl KeyValueStore {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create a store from a validated configuration.
    ///
    /// The store is not operable until [`open`](Self::open) is called.
    pub fn initialize(config: Config) -> Self {
        Self {
            config,
            state: State::Initialized,
        }
    }

    /// Construct the configured backend and load the record store.
    ///
    /// Valid only once, from the initialized state. File mode loads and
    /// validates an existing database file; a missing file starts empty.
    pub fn open(&mut self) -> Result<()> {
        if !matches!(self.state, State::Initialized) {
            return Err(StoreError::InvalidState(
                "open is only valid on an initialized, unopened store",
            ));
        }

        let (backend, records) = match self.config.mode {
            Mode::InMemory => Backend::memory(),
            Mode::File => {
                // Validated at build time; the builder rejects File mode
                // without a path
                let path = self.config.file_path.as_deref().ok_or(
                    StoreError::ConfigurationInvalid(
                        "file mode requires a database path".to_string(),
                    ),
                )?;
                Backend::file(path)?
            }
        };

        info!(
            mode = ?self.config.mode,
            keys = records.len(),
            "store opened"
        );
        self.state = State::Open(Session { records, backend });
        Ok(())
    }

    /// Flush and release the backend. The store is terminal afterwards.
    ///
    /// Closing a store that is not open signals `InvalidState` and
    /// leaves the current state untouched.
    pub fn close(&mut self) -> Result<()> {
        if !matches!(self.state, State::Open(_)) {
            return Err(StoreError::InvalidState("close is only valid on an open store"));
        }

        if let State::Open(mut session) = mem::replace(&mut self.state, State::Closed) {
            session.backend.close(&session.records)?;
        }
        info!("store closed");
        Ok(())
    }

    /// True while the store is operable
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /// The configuration this store was initialized with
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // CRUD Operations
    // =========================================================================

    /// Insert or overwrite one record.
    ///
    /// Never fails for a well-formed key; the key count changes only on
    /// insert, not on overwrite.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let session = self.session_mut()?;
        let key = key.into();
        let value = value.into();

        let prior = session.records.set(key.clone(), value);
        if let Err(err) = session.backend.persist(&session.records) {
            warn!(%key, "persist failed, rolling back set");
            match prior {
                Some(old) => session.records.set(key, old),
                None => session.records.remove(&key),
            };
            return Err(err);
        }

        debug!(%key, "set");
        Ok(())
    }

    /// Insert or overwrite from an [`Entry`]; identical to
    /// [`set`](Self::set)
    pub fn set_entry(&mut self, entry: Entry) -> Result<()> {
        self.set(entry.key, entry.value)
    }

    /// Look up one value.
    ///
    /// A missing key yields `Ok(None)`, or `Err(KeyNotFound)` when
    /// `throw_on_get_key_not_found` is enabled.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let session = self.session()?;
        match session.records.get(key) {
            Some(value) => Ok(Some(value.to_string())),
            None if self.config.throw_on_get_key_not_found => {
                Err(StoreError::KeyNotFound(key.to_string()))
            }
            None => Ok(None),
        }
    }

    /// Pure existence check, no side effect
    pub fn key_exists(&self, key: &str) -> Result<bool> {
        Ok(self.session()?.records.contains(key))
    }

    /// Current number of unique keys
    pub fn key_count(&self) -> Result<usize> {
        Ok(self.session()?.records.len())
    }

    /// Remove one record; silently a no-op when the key is absent
    pub fn clear(&mut self, key: &str) -> Result<()> {
        let session = self.session_mut()?;

        let Some(prior) = session.records.remove(key) else {
            return Ok(());
        };
        if let Err(err) = session.backend.persist(&session.records) {
            warn!(%key, "persist failed, rolling back clear");
            session.records.set(key.to_string(), prior);
            return Err(err);
        }

        debug!(%key, "cleared");
        Ok(())
    }

    /// Remove every record.
    ///
    /// Signals `OperationDisallowed` and performs no mutation when
    /// `throw_on_clear_all` is enabled. Atomic either way: the store is
    /// fully cleared or untouched.
    pub fn clear_all(&mut self) -> Result<()> {
        if self.config.throw_on_clear_all {
            // State check still applies before the policy is reported
            self.session()?;
            return Err(StoreError::OperationDisallowed(
                "clear_all is disabled by configuration",
            ));
        }

        let session = self.session_mut()?;
        let saved = session.records.take_all();
        if let Err(err) = session.backend.persist(&session.records) {
            warn!("persist failed, rolling back clear_all");
            session.records.restore(saved);
            return Err(err);
        }

        debug!(removed = saved.len(), "cleared all");
        Ok(())
    }

    // =========================================================================
    // Query Operations (live, lazy)
    // =========================================================================

    /// Live iterator over every key, in lexicographic order
    pub fn query_all_keys(&self) -> Result<Keys<'_>> {
        self.query_keys_starting_with("")
    }

    /// Live iterator over every (key, value) pair
    pub fn query_all_key_values(&self) -> Result<KeyValues<'_>> {
        self.query_key_values_starting_with("")
    }

    /// Live iterator over keys starting with a literal prefix.
    ///
    /// The empty prefix matches every key.
    pub fn query_keys_starting_with<'a>(&'a self, prefix: &'a str) -> Result<Keys<'a>> {
        Ok(Keys::new(&self.session()?.records, prefix))
    }

    /// Live iterator over (key, value) pairs starting with a literal
    /// prefix
    pub fn query_key_values_starting_with<'a>(
        &'a self,
        prefix: &'a str,
    ) -> Result<KeyValues<'a>> {
        Ok(KeyValues::new(&self.session()?.records, prefix))
    }

    // =========================================================================
    // Fetch Operations (materialized snapshots)
    // =========================================================================

    /// Owned snapshot of every key; stable across later mutations
    pub fn fetch_all_keys(&self) -> Result<Vec<String>> {
        self.fetch_keys_starting_with("")
    }

    /// Owned snapshot of every (key, value) pair
    pub fn fetch_all_key_values(&self) -> Result<Vec<Entry>> {
        self.fetch_key_values_starting_with("")
    }

    /// Owned snapshot of keys starting with a literal prefix
    pub fn fetch_keys_starting_with(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(query::fetch_keys(&self.session()?.records, prefix))
    }

    /// Owned snapshot of (key, value) pairs starting with a literal
    /// prefix
    pub fn fetch_key_values_starting_with(&self, prefix: &str) -> Result<Vec<Entry>> {
        Ok(query::fetch_key_values(&self.session()?.records, prefix))
    }

    // =========================================================================
    // State Helpers
    // =========================================================================

    fn session(&self) -> Result<&Session> {
        match &self.state {
            State::Open(session) => Ok(session),
            _ => Err(StoreError::InvalidState("store is not open")),
        }
    }

    fn session_mut(&mut self) -> Result<&mut Session> {
        match &mut self.state {
            State::Open(session) => Ok(session),
            _ => Err(StoreError::InvalidState("store is not open")),
        }
    }
}

impl Drop for KeyValueStore {
    /// Release the backend on scope exit even when `close` was never
    /// called. Errors here cannot propagate; they are logged.
    fn drop(&mut self) {
        if let State::Open(mut session) = mem::replace(&mut self.state, State::Closed) {
            if let Err(err) = session.backend.close(&session.records) {
                warn!(%err, "failed to flush store during drop");
            }
        }
    }
}
