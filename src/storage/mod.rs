//! Persistence store for the world tables.
//!
//! The journal is the canonical persistent state: an append-only record file
//! with no in-place updates, checksum-verified on replay. The in-memory
//! tables are a projection of it, rebuilt at startup.
//!
//! # Design Principles
//!
//! - Append-only journal, fsync before the tables change
//! - Checksums on every record, halt on corruption
//! - Constraint enforcement (unique keys, foreign keys) in the store,
//!   with repository pre-checks only as a fast path
//! - One read or write transaction per request

mod errors;
mod journal;
mod store;

pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use journal::{JournalEntry, JournalReader, JournalWriter};
pub use store::{CascadeOutcome, ReadTxn, Store, WriteTxn};
