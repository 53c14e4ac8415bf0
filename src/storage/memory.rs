//! In-memory store.

use crate::access::Record;
use crate::catalog::TableMeta;
use crate::index::BitmapIndex;
use crate::storage::error::StorageResult;
use crate::storage::page::{PageNumber, RecordPage};
use crate::storage::store::Store;
use dashmap::DashMap;
use std::collections::BTreeSet;

/// `Store` that keeps cloned snapshots in concurrent maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: DashMap<String, TableMeta>,
    records: DashMap<String, Vec<Record>>,
    pages: DashMap<(String, PageNumber), RecordPage>,
    indexes: DashMap<(String, String), BitmapIndex>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops a stored page, as if it had been lost. Returns whether it existed.
    pub fn remove_page(&self, table: &str, page: PageNumber) -> bool {
        self.pages.remove(&(table.to_string(), page)).is_some()
    }

    /// Replaces a stored page without going through the engine.
    pub fn overwrite_page(&self, table: &str, page: PageNumber, data: RecordPage) {
        self.pages.insert((table.to_string(), page), data);
    }
}

impl Store for MemoryStore {
    fn reset_all(&self) -> StorageResult<()> {
        self.tables.clear();
        self.records.clear();
        self.pages.clear();
        self.indexes.clear();
        Ok(())
    }

    fn load_table_meta(&self, table: &str) -> StorageResult<Option<TableMeta>> {
        Ok(self.tables.get(table).map(|e| e.value().clone()))
    }

    fn store_table_meta(&self, table: &str, meta: &TableMeta) -> StorageResult<()> {
        self.tables.insert(table.to_string(), meta.clone());
        Ok(())
    }

    fn load_records(&self, table: &str) -> StorageResult<Option<Vec<Record>>> {
        Ok(self.records.get(table).map(|e| e.value().clone()))
    }

    fn store_records(&self, table: &str, records: &[Record]) -> StorageResult<()> {
        self.records.insert(table.to_string(), records.to_vec());
        Ok(())
    }

    fn load_page(&self, table: &str, page: PageNumber) -> StorageResult<Option<RecordPage>> {
        Ok(self
            .pages
            .get(&(table.to_string(), page))
            .map(|e| e.value().clone()))
    }

    fn store_page(&self, table: &str, page: PageNumber, data: &RecordPage) -> StorageResult<()> {
        self.pages.insert((table.to_string(), page), data.clone());
        Ok(())
    }

    fn load_index(&self, table: &str, column: &str) -> StorageResult<Option<BitmapIndex>> {
        Ok(self
            .indexes
            .get(&(table.to_string(), column.to_string()))
            .map(|e| e.value().clone()))
    }

    fn store_index(&self, table: &str, column: &str, index: &BitmapIndex) -> StorageResult<()> {
        self.indexes
            .insert((table.to_string(), column.to_string()), index.clone());
        Ok(())
    }

    fn trace_all(&self) -> StorageResult<String> {
        // Sorted so the listing is stable regardless of map iteration order
        let mut lines = BTreeSet::new();
        for entry in self.tables.iter() {
            lines.insert(format!(
                "{}: table, pages={}, records={}",
                entry.key(),
                entry.page_count,
                entry.record_count
            ));
        }
        for entry in self.records.iter() {
            lines.insert(format!("{}/records: {} records", entry.key(), entry.len()));
        }
        for entry in self.pages.iter() {
            let (table, page) = entry.key();
            lines.insert(format!("{}/page_{}: {} records", table, page, entry.len()));
        }
        for entry in self.indexes.iter() {
            let (table, column) = entry.key();
            lines.insert(format!(
                "{}/index_{}: size={}, values={}",
                table,
                column,
                entry.size(),
                entry.distinct_count()
            ));
        }
        Ok(lines.into_iter().collect::<Vec<_>>().join("\n"))
    }
}
