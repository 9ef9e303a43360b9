//! # KeyLite
//!
//! An embedded key-value store with:
//! - One uniform API over two backing modes: in-memory and single-file
//! - Ordered keys with efficient prefix-range queries
//! - Live (lazy) and materialized (snapshot) query variants
//! - Configurable failure policy for get-on-missing-key and clear-all
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Host Process                             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   KeyValueStore                              │
//! │        (lifecycle state machine + error policy)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ RecordStore │          │   Backend   │
//!   │  (BTreeMap) │          │ Memory/File │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │    Query    │
//!   │ query/fetch │
//!   └─────────────┘
//! ```
//!
//! Every mutating operation is routed through the backend before it
//! returns, so a successful call is durable in file mode. The store is a
//! single-session resource: one thread owns it, and the backing file
//! handle is released on every exit path.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod records;
pub mod query;
pub mod backend;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::{Config, Mode};
pub use records::Entry;
pub use store::KeyValueStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of KeyLite
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
