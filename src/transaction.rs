//! Table-level transaction support.
//!
//! Every engine operation is a read-modify-write cycle over persisted state.
//! This module serializes those cycles per table:
//!
//! - **TableLocks**: One exclusive lock per table name
//! - **TableHandle**: Holds the lock, the loaded metadata and commits it back
//!
//! Writes to pages and indexes are not atomic with the metadata commit; a
//! failure between them leaves the earlier writes in place.

pub mod handle;
pub mod lock;

pub use handle::TableHandle;
pub use lock::{TableLockGuard, TableLocks};
