//! Storage layer implementation for pagedb.
//!
//! This module provides persistent storage for tables using fixed-capacity
//! record pages. Key components:
//!
//! - **RecordPage**: Append-only container of at most `page_capacity` records
//! - **Store**: Keyed load/store of table metadata, pages and bitmap indexes
//! - **MemoryStore**: Store backed by concurrent in-memory maps
//! - **FileStore**: Store backed by one framed file per key on disk
//!
//! Stores hold snapshots only; they never merge a stored value with an
//! earlier one. Coordinating read-modify-write cycles is the job of the
//! transaction layer.

pub mod disk;
pub mod error;
pub mod memory;
pub mod page;
pub mod store;

pub use disk::FileStore;
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use page::{PageNumber, RecordPage};
pub use store::Store;
