//! Scoped write access to one table.

use crate::access::Record;
use crate::catalog::TableMeta;
use crate::database::EngineError;
use crate::storage::Store;
use crate::transaction::lock::{TableLockGuard, TableLocks};
use anyhow::{Context, Result};

/// Exclusive, load-mutate-commit access to a table.
///
/// Opening a handle takes the table's lock and loads its metadata. The
/// reference record set is loaded on first use. Changes to either become
/// durable on [`commit`](Self::commit). A handle dropped without committing
/// discards them; the lock is released in both cases. Pages and indexes written through [`store`](Self::store) while
/// the handle is open go to the store immediately.
pub struct TableHandle<'a> {
    store: &'a dyn Store,
    meta: TableMeta,
    records: Option<Vec<Record>>,
    records_dirty: bool,
    committed: bool,
    lock: TableLockGuard,
}

impl<'a> TableHandle<'a> {
    /// Locks and loads an existing table.
    pub fn open(store: &'a dyn Store, locks: &TableLocks, table: &str) -> Result<Self> {
        let lock = locks.acquire(table);
        let meta = store
            .load_table_meta(table)
            .with_context(|| format!("Failed to load metadata for table '{}'", table))?
            .ok_or_else(|| EngineError::TableNotFound(table.to_string()))?;

        Ok(Self {
            store,
            meta,
            records: None,
            records_dirty: false,
            committed: false,
            lock,
        })
    }

    /// Locks a table name that must not exist yet and starts it from `meta`.
    pub fn create(store: &'a dyn Store, locks: &TableLocks, meta: TableMeta) -> Result<Self> {
        let lock = locks.acquire(&meta.name);
        let existing = store
            .load_table_meta(&meta.name)
            .with_context(|| format!("Failed to load metadata for table '{}'", meta.name))?;
        if existing.is_some() {
            return Err(EngineError::TableAlreadyExists(meta.name.clone()).into());
        }

        Ok(Self {
            store,
            meta,
            records: Some(Vec::new()),
            records_dirty: true,
            committed: false,
            lock,
        })
    }

    pub fn meta(&self) -> &TableMeta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut TableMeta {
        &mut self.meta
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn store(&self) -> &'a dyn Store {
        self.store
    }

    /// Every record appended to the table, in global-position order.
    pub fn records(&mut self) -> Result<&[Record]> {
        Ok(self.loaded_records()?.as_slice())
    }

    /// Appends to the reference record set. Stored on commit.
    pub fn push_record(&mut self, record: Record) -> Result<()> {
        self.loaded_records()?.push(record);
        self.records_dirty = true;
        Ok(())
    }

    fn loaded_records(&mut self) -> Result<&mut Vec<Record>> {
        if self.records.is_none() {
            let records = self
                .store
                .load_records(&self.meta.name)
                .with_context(|| format!("Failed to load records of table '{}'", self.meta.name))?
                .unwrap_or_default();
            self.records = Some(records);
        }
        Ok(self.records.get_or_insert_with(Vec::new))
    }

    /// Persists the record set (if changed) and the metadata, then releases
    /// the lock.
    pub fn commit(mut self) -> Result<()> {
        if self.records_dirty {
            if let Some(records) = &self.records {
                self.store
                    .store_records(&self.meta.name, records)
                    .with_context(|| {
                        format!("Failed to store records of table '{}'", self.meta.name)
                    })?;
            }
        }
        self.store
            .store_table_meta(&self.meta.name, &self.meta)
            .with_context(|| format!("Failed to store metadata for table '{}'", self.meta.name))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for TableHandle<'_> {
    fn drop(&mut self) {
        if !self.committed {
            log::debug!("Discarding uncommitted metadata for table '{}'", self.lock.table());
        }
    }
}
