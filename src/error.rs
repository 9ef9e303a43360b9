//! Error types for KeyLite
//!
//! Provides a unified error type for all operations.
//!
//! Only two conditions are policy-gated by [`Config`](crate::Config):
//! `KeyNotFound` from `get` and `OperationDisallowed` from `clear_all`.
//! Every other variant always signals.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for KeyLite operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("operation disallowed: {0}")]
    OperationDisallowed(&'static str),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration invalid: {0}")]
    ConfigurationInvalid(String),

    // -------------------------------------------------------------------------
    // Persistence Errors
    // -------------------------------------------------------------------------
    #[error("store open failed: {0}")]
    StoreOpenFailed(String),

    #[error("persistence failed: {0}")]
    PersistenceFailed(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("serialization error: {0}")]
    Serialization(String),
}
