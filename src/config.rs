//! Configuration for KeyLite
//!
//! Centralized, immutable configuration built once before `open()`.
//!
//! The builder validates eagerly: a `File` mode config cannot be built
//! without a non-empty path, so a `KeyValueStore` never holds a config
//! it could not open.

use std::path::PathBuf;

use crate::error::{Result, StoreError};

/// Backing mode for the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No durability; data lives only for the session
    InMemory,

    /// Single-file durability; every mutation is persisted before returning
    File,
}

/// Main configuration for a KeyLite store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Backend Selection
    // -------------------------------------------------------------------------
    /// Which persistence backend to construct at `open()`
    pub mode: Mode,

    /// Path of the database file; required iff `mode == File`,
    /// ignored in memory mode
    pub file_path: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Failure Policy
    // -------------------------------------------------------------------------
    /// When true, `clear_all()` signals `OperationDisallowed` and
    /// performs no mutation
    pub throw_on_clear_all: bool,

    /// When true, `get()` on a missing key signals `KeyNotFound`
    /// instead of returning `Ok(None)`
    pub throw_on_get_key_not_found: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::InMemory,
            file_path: None,
            throw_on_clear_all: false,
            throw_on_get_key_not_found: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Select the in-memory backend (the default)
    pub fn in_memory(mut self) -> Self {
        self.config.mode = Mode::InMemory;
        self
    }

    /// Select the single-file backend with the given database path
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.mode = Mode::File;
        self.config.file_path = Some(path.into());
        self
    }

    /// Make `clear_all()` signal instead of clearing
    pub fn throw_on_clear_all(mut self, enabled: bool) -> Self {
        self.config.throw_on_clear_all = enabled;
        self
    }

    /// Make `get()` signal on a missing key instead of returning None
    pub fn throw_on_get_key_not_found(mut self, enabled: bool) -> Self {
        self.config.throw_on_get_key_not_found = enabled;
        self
    }

    /// Validate and produce the immutable config
    pub fn build(self) -> Result<Config> {
        if self.config.mode == Mode::File {
            match &self.config.file_path {
                Some(path) if !path.as_os_str().is_empty() => {}
                _ => {
                    return Err(StoreError::ConfigurationInvalid(
                        "file mode requires a non-empty database path".to_string(),
                    ));
                }
            }
        }
        Ok(self.config)
    }
}
