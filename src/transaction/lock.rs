//! Per-table exclusive locks.

use dashmap::DashMap;
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use std::sync::Arc;

/// Registry of one mutex per table name. Tables never share a lock, so work
/// on different tables proceeds in parallel.
#[derive(Debug, Default)]
pub struct TableLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl TableLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the lock for `table` is free and returns an owned guard.
    /// Not reentrant: acquiring the same table twice on one thread deadlocks.
    pub fn acquire(&self, table: &str) -> TableLockGuard {
        // Clone the Arc out first so the map shard is not held while blocking
        let lock = {
            let entry = self
                .locks
                .entry(table.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())));
            Arc::clone(entry.value())
        };

        TableLockGuard {
            table: table.to_string(),
            _guard: lock.lock_arc(),
        }
    }

    /// Like [`acquire`](Self::acquire) but returns `None` if the lock is held.
    pub fn try_acquire(&self, table: &str) -> Option<TableLockGuard> {
        let lock = {
            let entry = self
                .locks
                .entry(table.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())));
            Arc::clone(entry.value())
        };

        lock.try_lock_arc().map(|guard| TableLockGuard {
            table: table.to_string(),
            _guard: guard,
        })
    }
}

/// Held for the duration of a table's read-modify-write cycle. Released on drop.
pub struct TableLockGuard {
    table: String,
    _guard: ArcMutexGuard<RawMutex, ()>,
}

impl TableLockGuard {
    pub fn table(&self) -> &str {
        &self.table
    }
}
