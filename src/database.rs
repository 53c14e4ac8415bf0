pub mod error;

pub use error::EngineError;

use crate::access::{Condition, Record, format_list};
use crate::catalog::TableMeta;
use crate::config::EngineConfig;
use crate::index::{BitVector, BitmapIndex};
use crate::storage::{FileStore, MemoryStore, PageNumber, RecordPage, Store};
use crate::trace::Stopwatch;
use crate::transaction::{TableHandle, TableLocks};
use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::Arc;

/// High-level engine interface: tables of string records stored in
/// fixed-capacity pages, with optional bitmap indexes per column.
///
/// Every call loads the table's current state from the store, works on an
/// in-memory copy and writes the result back while holding the table's lock.
/// Nothing is cached between calls, so several `Database` values over the same
/// store see each other's writes (but do not share locks).
pub struct Database {
    store: Arc<dyn Store>,
    locks: TableLocks,
    config: EngineConfig,
}

/// A condition column resolved against the table schema.
struct ColumnFilter<'c> {
    column: &'c str,
    position: usize,
    value: &'c str,
}

impl Database {
    pub fn new(store: Arc<dyn Store>, config: EngineConfig) -> Self {
        Self {
            store,
            locks: TableLocks::new(),
            config,
        }
    }

    /// A database over a fresh [`MemoryStore`].
    pub fn in_memory(config: EngineConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }

    /// A database over a [`FileStore`] rooted at `path`, created if missing.
    pub fn open(path: &Path, config: EngineConfig) -> Result<Self> {
        let store = FileStore::open(path)
            .with_context(|| format!("Failed to open data directory {:?}", path))?;
        Ok(Self::new(Arc::new(store), config))
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Clears every table, page and index in the store.
    pub fn reset(&self) -> Result<()> {
        self.store.reset_all().context("Failed to reset store")?;
        Ok(())
    }

    /// Listing of everything held by the store.
    pub fn storage_trace(&self) -> Result<String> {
        self.store.trace_all().context("Failed to list store contents")
    }

    /// Create a new table with the given column order.
    pub fn create_table(&self, table: &str, columns: &[&str]) -> Result<()> {
        let mut seen = HashSet::new();
        for column in columns {
            if !seen.insert(*column) {
                return Err(EngineError::DuplicateColumn(column.to_string()).into());
            }
        }

        let columns = columns.iter().map(|c| c.to_string()).collect();
        let meta = TableMeta::new(table, columns, &self.config);
        TableHandle::create(self.store.as_ref(), &self.locks, meta)?.commit()?;

        log::info!("Created table '{}'", table);
        Ok(())
    }

    /// Metadata of a table as currently stored. Does not add a trace entry.
    pub fn table(&self, table: &str) -> Result<TableMeta> {
        self.load_meta(table)
    }

    /// Append a record to the table and extend every bitmap index on it.
    pub fn insert(&self, table: &str, record: impl Into<Record>) -> Result<()> {
        let record = record.into();
        let timer = Stopwatch::start();
        let mut handle = self.open_table(table)?;

        let expected = handle.meta().columns.len();
        if record.len() != expected {
            return Err(EngineError::RecordArity {
                expected,
                actual: record.len(),
            }
            .into());
        }

        let page_number = self.append_to_pages(&mut handle, record.clone())?;
        handle.push_record(record.clone())?;

        let meta = handle.meta_mut();
        meta.record_count += 1;
        let position = meta.record_count - 1;
        let record_count = meta.record_count;

        self.extend_indexes(&handle, &record, position, record_count)?;

        log::debug!(
            "Inserted record at position {} of table '{}' (page {})",
            position,
            table,
            page_number
        );
        handle.meta_mut().trace.push(format!(
            "Inserted: {}, at page number:{}, execution time (mil):{}",
            record,
            page_number,
            timer.elapsed_millis()
        ));
        handle.commit()
    }

    /// Every record in page order.
    pub fn select_all(&self, table: &str) -> Result<Vec<Record>> {
        let timer = Stopwatch::start();
        let mut handle = self.open_table(table)?;

        let records = scan_pages(&handle)?;

        let meta = handle.meta_mut();
        let entry = format!(
            "Select all pages:{}, records:{}, execution time (mil):{}",
            meta.page_count,
            meta.record_count,
            timer.elapsed_millis()
        );
        meta.trace.push(entry);
        handle.commit()?;
        Ok(records)
    }

    /// The record at `record_offset` on page `page_number`, or nothing if
    /// either is out of range.
    pub fn select_by_pointer(
        &self,
        table: &str,
        page_number: usize,
        record_offset: usize,
    ) -> Result<Vec<Record>> {
        let timer = Stopwatch::start();
        let mut handle = self.open_table(table)?;

        let records = if page_number < handle.meta().page_count {
            load_page(&handle, PageNumber(page_number))?
                .map(|page| page.select_at(record_offset))
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        handle.meta_mut().trace.push(format!(
            "Select pointer page:{}, record:{}, total output count:{}, execution time (mil):{}",
            page_number,
            record_offset,
            records.len(),
            timer.elapsed_millis()
        ));
        handle.commit()?;
        Ok(records)
    }

    /// Linear scan for records whose `cols` equal `vals`.
    pub fn select_by_columns(&self, table: &str, cols: &[&str], vals: &[&str]) -> Result<Vec<Record>> {
        let timer = Stopwatch::start();
        let mut handle = self.open_table(table)?;

        let filters = resolve_columns(handle.meta(), cols, vals)?;
        let cond = build_condition(handle.meta(), &filters);
        let (records, per_page) = scan_with_condition(&handle, &cond)?;

        let per_page: Vec<String> = per_page
            .iter()
            .map(|(page, count)| format_list(&[page.0, *count]))
            .collect();
        handle.meta_mut().trace.push(format!(
            "Select condition:{}->{}, Records per page:{}, records:{}, execution time (mil):{}",
            format_list(cols),
            format_list(vals),
            format_list(&per_page),
            records.len(),
            timer.elapsed_millis()
        ));
        handle.commit()?;
        Ok(records)
    }

    /// Build (or rebuild) the bitmap index for `column` over all current
    /// records. A column the table does not have is ignored.
    pub fn create_bitmap_index(&self, table: &str, column: &str) -> Result<()> {
        let timer = Stopwatch::start();
        let mut handle = self.open_table(table)?;

        let Some(position) = handle.meta().column_position(column) else {
            log::warn!(
                "Ignoring index request for unknown column '{}' of table '{}'",
                column,
                table
            );
            return Ok(());
        };

        let rebuild = handle.meta().is_indexed(column);
        let mut index = BitmapIndex::new();
        index.update_size(handle.meta().record_count);
        for (i, record) in handle.records()?.iter().enumerate() {
            if let Some(value) = record.field(position) {
                index.insert(value, i);
            }
        }

        handle
            .store()
            .store_index(table, column, &index)
            .with_context(|| format!("Failed to store index '{}' of table '{}'", column, table))?;

        log::info!(
            "{} bitmap index on '{}.{}' ({} records, {} distinct values)",
            if rebuild { "Rebuilt" } else { "Built" },
            table,
            column,
            index.size(),
            index.distinct_count()
        );
        let meta = handle.meta_mut();
        meta.add_indexed_column(column);
        meta.trace.push(format!(
            "Index created for column: {}, execution time (mil):{}",
            column,
            timer.elapsed_millis()
        ));
        handle.commit()
    }

    /// Equality selection that answers indexed columns from their bitmaps and
    /// filters the rest linearly.
    pub fn select_index(&self, table: &str, cols: &[&str], vals: &[&str]) -> Result<Vec<Record>> {
        let timer = Stopwatch::start();
        let mut handle = self.open_table(table)?;

        let filters = resolve_columns(handle.meta(), cols, vals)?;
        let mut indexed = Vec::new();
        let mut non_indexed = Vec::new();
        for filter in filters {
            match load_index(&handle, filter.column)? {
                Some(index) => indexed.push((filter, index)),
                None => non_indexed.push(filter),
            }
        }

        let mut indexed_count = 0;
        let mut result = if indexed.is_empty() {
            let cond = build_condition(handle.meta(), &non_indexed);
            scan_with_condition(&handle, &cond)?.0
        } else {
            let mut records = scan_positions(&handle)?;
            let mut selected = BitVector::ones(records.len());
            for (filter, index) in &indexed {
                let bits = index.bits(filter.value);
                // Reported count is for the last index only, not the intersection
                indexed_count = bits.count_ones();
                selected.and_assign(&bits);
            }
            selected
                .iter_ones()
                .filter_map(|position| records.get_mut(position).and_then(Option::take))
                .collect()
        };

        if !non_indexed.is_empty() {
            result.retain(|record| {
                non_indexed
                    .iter()
                    .all(|f| record.field(f.position) == Some(f.value))
            });
        }

        let mut indexed_columns: Vec<&str> = indexed.iter().map(|(f, _)| f.column).collect();
        let mut non_indexed_columns: Vec<&str> = non_indexed.iter().map(|f| f.column).collect();
        indexed_columns.sort_unstable();
        non_indexed_columns.sort_unstable();

        let mut entry = format!(
            "Select index condition:{}->{}",
            format_list(cols),
            format_list(vals)
        );
        if !indexed_columns.is_empty() {
            entry.push_str(&format!(
                ", Indexed columns: {}, Indexed selection count: {}",
                format_list(&indexed_columns),
                indexed_count
            ));
        }
        if !non_indexed_columns.is_empty() {
            entry.push_str(&format!(", Non Indexed: {}", format_list(&non_indexed_columns)));
        }
        entry.push_str(&format!(
            ", Final count: {}, execution time (mil):{}",
            result.len(),
            timer.elapsed_millis()
        ));

        log::debug!(
            "Index selection on '{}': {} indexed, {} non-indexed, {} results",
            table,
            indexed_columns.len(),
            non_indexed_columns.len(),
            result.len()
        );
        handle.meta_mut().trace.push(entry);
        handle.commit()?;
        Ok(result)
    }

    /// The `'1'`/`'0'` bitmap of `value` in the index on `column`, or an empty
    /// string when there is no such index.
    pub fn get_value_bits(&self, table: &str, column: &str, value: &str) -> Result<String> {
        let index = self
            .store
            .load_index(table, column)
            .with_context(|| format!("Failed to load index '{}' of table '{}'", column, table))?;
        Ok(index
            .map(|index| index.get_bit_string(value))
            .unwrap_or_default())
    }

    /// Records the table should hold that are not found on any stored page,
    /// in table order. Records are compared by content, so of two identical
    /// records only the presence of one can be checked.
    pub fn validate(&self, table: &str) -> Result<Vec<Record>> {
        let mut handle = self.open_table(table)?;

        let present: HashSet<Record> = scan_pages(&handle)?.into_iter().collect();
        let missing: Vec<Record> = handle
            .records()?
            .iter()
            .filter(|record| !present.contains(*record))
            .cloned()
            .collect();

        if !missing.is_empty() {
            log::warn!("Table '{}' is missing {} records", table, missing.len());
        }
        handle.meta_mut().trace.push(format!(
            "Validating records: {} records missing.",
            missing.len()
        ));
        handle.commit()?;
        Ok(missing)
    }

    /// Rewrites every page that should hold one of `missing`, in full, from
    /// the table's reference record set. Returns the rewritten page numbers
    /// in ascending order.
    pub fn recover(&self, table: &str, missing: &[Record]) -> Result<Vec<PageNumber>> {
        let mut handle = self.open_table(table)?;
        let capacity = handle.meta().page_capacity;
        let store = handle.store();
        let records = handle.records()?;

        let mut pages = BTreeSet::new();
        for record in missing {
            match records.iter().position(|r| r == record) {
                Some(position) => {
                    pages.insert(PageNumber::for_position(position, capacity));
                }
                None => log::warn!("Cannot recover unknown record {} in table '{}'", record, table),
            }
        }

        for &page_number in &pages {
            let start = page_number.first_position(capacity);
            let end = (start + capacity).min(records.len());

            let mut page = RecordPage::new(capacity);
            for record in &records[start..end] {
                page.insert(record.clone());
            }
            store
                .store_page(table, page_number, &page)
                .with_context(|| {
                    format!("Failed to store page {} of table '{}'", page_number, table)
                })?;
        }

        let pages: Vec<PageNumber> = pages.into_iter().collect();
        if !pages.is_empty() {
            log::info!("Recovered pages {} of table '{}'", format_list(&pages), table);
        }
        handle.meta_mut().trace.push(format!(
            "Recovering {} records in pages: {}",
            missing.len(),
            format_list(&pages)
        ));
        handle.commit()?;
        Ok(pages)
    }

    /// All trace entries followed by a page/record/index summary line.
    pub fn get_full_trace(&self, table: &str) -> Result<String> {
        let meta = self.load_meta(table)?;
        if meta.trace.evicted() > 0 {
            log::debug!(
                "Full trace of '{}' omits {} evicted entries",
                table,
                meta.trace.evicted()
            );
        }
        Ok(meta.full_trace())
    }

    /// The most recent trace entry.
    pub fn get_last_trace(&self, table: &str) -> Result<String> {
        Ok(self.load_meta(table)?.last_trace())
    }

    fn open_table(&self, table: &str) -> Result<TableHandle<'_>> {
        TableHandle::open(self.store.as_ref(), &self.locks, table)
    }

    fn load_meta(&self, table: &str) -> Result<TableMeta> {
        let meta = self
            .store
            .load_table_meta(table)
            .with_context(|| format!("Failed to load metadata for table '{}'", table))?
            .ok_or_else(|| EngineError::TableNotFound(table.to_string()))?;
        Ok(meta)
    }

    /// Puts `record` on the last page, or on a new page if that one is full.
    /// Does not touch the record count.
    fn append_to_pages(&self, handle: &mut TableHandle<'_>, record: Record) -> Result<PageNumber> {
        let table = handle.name().to_string();
        let capacity = handle.meta().page_capacity;

        let last = handle.meta().last_page();
        let current = match last {
            Some(last) => Some((last, self.last_page_or_rebuild(handle, last)?)),
            None => None,
        };

        let page_number = match current {
            Some((number, mut page)) if !page.is_full() => {
                page.insert(record);
                store_page(handle, number, &page)?;
                number
            }
            _ => {
                let mut page = RecordPage::new(capacity);
                page.insert(record);
                let meta = handle.meta_mut();
                meta.page_count += 1;
                let number = PageNumber(meta.page_count - 1);
                store_page(handle, number, &page)?;
                number
            }
        };

        log::debug!("Table '{}' now spans {} pages", table, handle.meta().page_count);
        Ok(page_number)
    }

    /// Loads the table's last page. A lost last page is rebuilt from the
    /// reference record set so appends keep filling it in order.
    fn last_page_or_rebuild(
        &self,
        handle: &mut TableHandle<'_>,
        last: PageNumber,
    ) -> Result<RecordPage> {
        if let Some(page) = load_page(handle, last)? {
            return Ok(page);
        }

        log::warn!(
            "Last page {} of table '{}' is missing, rebuilding it",
            last,
            handle.name()
        );
        let capacity = handle.meta().page_capacity;
        let start = last.first_position(capacity);
        let mut page = RecordPage::new(capacity);
        for record in handle.records()?.iter().skip(start) {
            page.insert(record.clone());
        }
        store_page(handle, last, &page)?;
        Ok(page)
    }

    /// Brings every index on the table up to `record_count` and marks the new
    /// record's value at `position`.
    fn extend_indexes(
        &self,
        handle: &TableHandle<'_>,
        record: &Record,
        position: usize,
        record_count: usize,
    ) -> Result<()> {
        let meta = handle.meta();
        for column in &meta.indexed_columns {
            let Some(mut index) = load_index(handle, column)? else {
                log::warn!(
                    "Index on '{}.{}' is registered but not stored, skipping",
                    meta.name,
                    column
                );
                continue;
            };
            let Some(value) = meta.column_position(column).and_then(|p| record.field(p)) else {
                continue;
            };

            index.update_size(record_count);
            index.insert(value, position);
            handle
                .store()
                .store_index(&meta.name, column, &index)
                .with_context(|| {
                    format!("Failed to store index '{}' of table '{}'", column, meta.name)
                })?;
        }
        Ok(())
    }
}

fn load_page(handle: &TableHandle<'_>, page: PageNumber) -> Result<Option<RecordPage>> {
    handle
        .store()
        .load_page(handle.name(), page)
        .with_context(|| format!("Failed to load page {} of table '{}'", page, handle.name()))
}

fn store_page(handle: &TableHandle<'_>, number: PageNumber, page: &RecordPage) -> Result<()> {
    handle
        .store()
        .store_page(handle.name(), number, page)
        .with_context(|| format!("Failed to store page {} of table '{}'", number, handle.name()))
}

fn load_index(handle: &TableHandle<'_>, column: &str) -> Result<Option<BitmapIndex>> {
    handle
        .store()
        .load_index(handle.name(), column)
        .with_context(|| format!("Failed to load index '{}' of table '{}'", column, handle.name()))
}

/// Concatenation of all stored pages. Lost pages contribute nothing.
fn scan_pages(handle: &TableHandle<'_>) -> Result<Vec<Record>> {
    let mut records = Vec::with_capacity(handle.meta().record_count);
    for page_number in handle.meta().pages() {
        match load_page(handle, page_number)? {
            Some(page) => records.extend(page.select_all()),
            None => log::warn!("Page {} of table '{}' is missing", page_number, handle.name()),
        }
    }
    Ok(records)
}

/// Stored records laid out by global position. Positions on lost pages are
/// `None`.
fn scan_positions(handle: &TableHandle<'_>) -> Result<Vec<Option<Record>>> {
    let meta = handle.meta();
    let mut slots = vec![None; meta.record_count];
    for page_number in meta.pages() {
        let Some(page) = load_page(handle, page_number)? else {
            log::warn!("Page {} of table '{}' is missing", page_number, handle.name());
            continue;
        };
        let start = page_number.first_position(meta.page_capacity);
        for (offset, record) in page.select_all().into_iter().enumerate() {
            if let Some(slot) = slots.get_mut(start + offset) {
                *slot = Some(record);
            }
        }
    }
    Ok(slots)
}

/// Matching records plus `(page, match count)` for every page with a match.
fn scan_with_condition(
    handle: &TableHandle<'_>,
    cond: &Condition,
) -> Result<(Vec<Record>, Vec<(PageNumber, usize)>)> {
    let mut records = Vec::new();
    let mut per_page = Vec::new();
    for page_number in handle.meta().pages() {
        let Some(page) = load_page(handle, page_number)? else {
            log::warn!("Page {} of table '{}' is missing", page_number, handle.name());
            continue;
        };
        let matched = page.select_by_condition(cond);
        if !matched.is_empty() {
            per_page.push((page_number, matched.len()));
            records.extend(matched);
        }
    }
    Ok((records, per_page))
}

fn resolve_columns<'c>(
    meta: &TableMeta,
    cols: &[&'c str],
    vals: &[&'c str],
) -> Result<Vec<ColumnFilter<'c>>> {
    if cols.len() != vals.len() {
        return Err(EngineError::ConditionArity {
            columns: cols.len(),
            values: vals.len(),
        }
        .into());
    }

    cols.iter()
        .zip(vals)
        .map(|(&column, &value)| -> Result<ColumnFilter<'c>> {
            let position = meta
                .column_position(column)
                .ok_or_else(|| EngineError::InvalidColumn {
                    table: meta.name.clone(),
                    column: column.to_string(),
                })?;
            Ok(ColumnFilter {
                column,
                position,
                value,
            })
        })
        .collect()
}

fn build_condition(meta: &TableMeta, filters: &[ColumnFilter<'_>]) -> Condition {
    let mut cond = Condition::any(meta.columns.len());
    for filter in filters {
        cond.require(filter.position, filter.value);
    }
    cond
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_db() -> Result<Database> {
        let db = Database::in_memory(EngineConfig::default());
        db.create_table("student", &["id", "name", "major", "semester", "gpa"])?;
        db.insert("student", ["1", "stud1", "CS", "5", "0.9"])?;
        db.insert("student", ["2", "stud2", "BI", "7", "1.2"])?;
        db.insert("student", ["3", "stud3", "CS", "2", "2.4"])?;
        Ok(db)
    }

    fn engine_error(err: &anyhow::Error) -> Option<&EngineError> {
        err.downcast_ref::<EngineError>()
    }

    #[test]
    fn test_create_table() -> Result<()> {
        let db = Database::in_memory(EngineConfig::default());
        db.create_table("t", &["a", "b"])?;

        let meta = db.table("t")?;
        assert_eq!(meta.columns, vec!["a", "b"]);
        assert_eq!(meta.page_count, 0);
        assert_eq!(
            db.get_last_trace("t")?,
            "Table created name:t, columnsNames:[a, b]"
        );
        Ok(())
    }

    #[test]
    fn test_create_table_errors() -> Result<()> {
        let db = Database::in_memory(EngineConfig::default());
        db.create_table("t", &["a"])?;

        let err = db.create_table("t", &["a"]).unwrap_err();
        assert_eq!(
            engine_error(&err),
            Some(&EngineError::TableAlreadyExists("t".to_string()))
        );

        let err = db.create_table("u", &["a", "a"]).unwrap_err();
        assert_eq!(
            engine_error(&err),
            Some(&EngineError::DuplicateColumn("a".to_string()))
        );
        assert!(db.table("u").is_err());
        Ok(())
    }

    #[test]
    fn test_insert_paginates() -> Result<()> {
        let db = student_db()?;
        let meta = db.table("student")?;
        assert_eq!(meta.page_count, 2);
        assert_eq!(meta.record_count, 3);
        assert!(meta.counts_consistent());

        let page0 = db.store().load_page("student", PageNumber(0))?.unwrap();
        let page1 = db.store().load_page("student", PageNumber(1))?.unwrap();
        assert_eq!(page0.len(), 2);
        assert_eq!(page1.len(), 1);

        assert!(db.get_last_trace("student")?.starts_with(
            "Inserted: [3, stud3, CS, 2, 2.4], at page number:1, execution time (mil):"
        ));
        Ok(())
    }

    #[test]
    fn test_insert_wrong_arity() -> Result<()> {
        let db = student_db()?;
        let before = db.table("student")?;

        let err = db.insert("student", ["9", "too-short"]).unwrap_err();
        assert_eq!(
            engine_error(&err),
            Some(&EngineError::RecordArity {
                expected: 5,
                actual: 2
            })
        );
        assert_eq!(db.table("student")?, before);
        Ok(())
    }

    #[test]
    fn test_unknown_table() {
        let db = Database::in_memory(EngineConfig::default());
        let err = db.insert("ghost", ["1"]).unwrap_err();
        assert_eq!(
            engine_error(&err),
            Some(&EngineError::TableNotFound("ghost".to_string()))
        );
        assert!(db.select_all("ghost").is_err());
        assert!(db.create_bitmap_index("ghost", "a").is_err());
        assert!(db.select_index("ghost", &[], &[]).is_err());
        assert!(db.get_full_trace("ghost").is_err());
    }

    #[test]
    fn test_select_all() -> Result<()> {
        let db = student_db()?;
        let records = db.select_all("student")?;
        assert_eq!(records.len(), 3);
        assert_eq!(records[1], Record::from(["2", "stud2", "BI", "7", "1.2"]));
        assert!(db
            .get_last_trace("student")?
            .starts_with("Select all pages:2, records:3, execution time (mil):"));
        Ok(())
    }

    #[test]
    fn test_select_by_pointer() -> Result<()> {
        let db = student_db()?;

        let found = db.select_by_pointer("student", 1, 0)?;
        assert_eq!(found, vec![Record::from(["3", "stud3", "CS", "2", "2.4"])]);
        assert!(db
            .get_last_trace("student")?
            .starts_with("Select pointer page:1, record:0, total output count:1,"));

        assert!(db.select_by_pointer("student", 1, 1)?.is_empty());
        assert!(db.select_by_pointer("student", 7, 0)?.is_empty());
        assert!(db
            .get_last_trace("student")?
            .starts_with("Select pointer page:7, record:0, total output count:0,"));
        Ok(())
    }

    #[test]
    fn test_select_by_columns() -> Result<()> {
        let db = student_db()?;

        let found = db.select_by_columns("student", &["major"], &["CS"])?;
        assert_eq!(found.len(), 2);
        assert!(db.get_last_trace("student")?.starts_with(
            "Select condition:[major]->[CS], Records per page:[[0, 1], [1, 1]], records:2,"
        ));

        let none = db.select_by_columns("student", &["major", "semester"], &["CS", "7"])?;
        assert!(none.is_empty());
        assert!(db
            .get_last_trace("student")?
            .contains("Records per page:[], records:0"));
        Ok(())
    }

    #[test]
    fn test_select_by_unknown_column() -> Result<()> {
        let db = student_db()?;
        let trace_len = db.table("student")?.trace.len();

        let err = db
            .select_by_columns("student", &["majr"], &["CS"])
            .unwrap_err();
        assert_eq!(
            engine_error(&err),
            Some(&EngineError::InvalidColumn {
                table: "student".to_string(),
                column: "majr".to_string()
            })
        );

        let err = db.select_index("student", &["major"], &[]).unwrap_err();
        assert_eq!(
            engine_error(&err),
            Some(&EngineError::ConditionArity {
                columns: 1,
                values: 0
            })
        );
        assert_eq!(db.table("student")?.trace.len(), trace_len);
        Ok(())
    }

    #[test]
    fn test_create_bitmap_index() -> Result<()> {
        let db = student_db()?;
        db.create_bitmap_index("student", "major")?;

        assert_eq!(db.get_value_bits("student", "major", "CS")?, "101");
        assert_eq!(db.get_value_bits("student", "major", "BI")?, "010");
        assert_eq!(db.get_value_bits("student", "major", "MATH")?, "000");
        assert_eq!(db.get_value_bits("student", "gpa", "0.9")?, "");
        assert!(db
            .get_last_trace("student")?
            .starts_with("Index created for column: major, execution time (mil):"));
        assert_eq!(db.table("student")?.indexed_columns(), vec!["major"]);
        Ok(())
    }

    #[test]
    fn test_create_index_unknown_column_is_noop() -> Result<()> {
        let db = student_db()?;
        let before = db.table("student")?;

        db.create_bitmap_index("student", "nope")?;
        assert_eq!(db.table("student")?, before);
        assert!(db.store().load_index("student", "nope")?.is_none());
        Ok(())
    }

    #[test]
    fn test_rebuild_index() -> Result<()> {
        let db = student_db()?;
        db.create_bitmap_index("student", "major")?;
        db.insert("student", ["4", "stud4", "CS", "9", "1.2"])?;
        db.create_bitmap_index("student", "major")?;

        assert_eq!(db.get_value_bits("student", "major", "CS")?, "1011");
        assert_eq!(db.table("student")?.indexed_columns(), vec!["major"]);
        Ok(())
    }

    #[test]
    fn test_select_index_partial() -> Result<()> {
        let db = student_db()?;
        db.create_bitmap_index("student", "major")?;

        let found = db.select_index("student", &["major", "semester"], &["CS", "5"])?;
        assert_eq!(found, vec![Record::from(["1", "stud1", "CS", "5", "0.9"])]);

        let last = db.get_last_trace("student")?;
        assert!(last.starts_with(
            "Select index condition:[major, semester]->[CS, 5], Indexed columns: [major], \
             Indexed selection count: 2, Non Indexed: [semester], Final count: 1,"
        ));
        Ok(())
    }

    #[test]
    fn test_select_index_without_indexes() -> Result<()> {
        let db = student_db()?;
        let trace_len = db.table("student")?.trace.len();

        let found = db.select_index("student", &["major"], &["CS"])?;
        assert_eq!(found.len(), 2);

        // One trace entry even though the linear scan was used
        assert_eq!(db.table("student")?.trace.len(), trace_len + 1);
        assert!(db.get_last_trace("student")?.starts_with(
            "Select index condition:[major]->[CS], Non Indexed: [major], Final count: 2,"
        ));
        Ok(())
    }

    #[test]
    fn test_select_index_unseen_value() -> Result<()> {
        let db = student_db()?;
        db.create_bitmap_index("student", "major")?;
        db.create_bitmap_index("student", "gpa")?;

        let found = db.select_index("student", &["gpa", "major"], &["0.9", "MATH"])?;
        assert!(found.is_empty());
        assert!(db
            .get_last_trace("student")?
            .contains("Indexed columns: [gpa, major], Indexed selection count: 0, Final count: 0"));
        Ok(())
    }

    #[test]
    fn test_validate_clean_table() -> Result<()> {
        let db = student_db()?;
        assert!(db.validate("student")?.is_empty());
        assert_eq!(
            db.get_last_trace("student")?,
            "Validating records: 0 records missing."
        );
        Ok(())
    }

    #[test]
    fn test_recover_nothing() -> Result<()> {
        let db = student_db()?;
        let pages_before: Vec<_> = (0..2)
            .map(|p| db.store().load_page("student", PageNumber(p)))
            .collect::<Result<_, _>>()?;
        let trace_len = db.table("student")?.trace.len();

        let recovered = db.recover("student", &[])?;
        assert!(recovered.is_empty());
        assert_eq!(db.table("student")?.trace.len(), trace_len + 1);
        assert_eq!(
            db.get_last_trace("student")?,
            "Recovering 0 records in pages: []"
        );

        let pages_after: Vec<_> = (0..2)
            .map(|p| db.store().load_page("student", PageNumber(p)))
            .collect::<Result<_, _>>()?;
        assert_eq!(pages_before, pages_after);
        Ok(())
    }

    #[test]
    fn test_append_after_lost_last_page() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        let db = Database::new(store.clone(), EngineConfig::default());
        db.create_table("t", &["a"])?;
        for v in ["1", "2", "3"] {
            db.insert("t", [v])?;
        }

        store.remove_page("t", PageNumber(1));
        db.insert("t", ["4"])?;

        let page = store.load_page("t", PageNumber(1))?.expect("page rebuilt");
        assert_eq!(page.records(), &[Record::from(["3"]), Record::from(["4"])]);
        let meta = db.table("t")?;
        assert_eq!((meta.page_count, meta.record_count), (2, 4));
        Ok(())
    }

    #[test]
    fn test_full_trace() -> Result<()> {
        let db = student_db()?;
        db.create_bitmap_index("student", "major")?;
        db.create_bitmap_index("student", "gpa")?;

        let full = db.get_full_trace("student")?;
        let lines: Vec<_> = full.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("Table created name:student"));
        assert_eq!(
            lines[6],
            "Pages Count: 2, Records Count: 3, Indexed Columns: [gpa, major]"
        );
        Ok(())
    }

    #[test]
    fn test_trace_retention() -> Result<()> {
        let db = Database::in_memory(EngineConfig::default().with_trace_retention(Some(2)));
        db.create_table("t", &["a"])?;
        for v in ["1", "2", "3"] {
            db.insert("t", [v])?;
        }

        let meta = db.table("t")?;
        assert_eq!(meta.trace.len(), 2);
        assert_eq!(meta.trace.evicted(), 2);
        assert!(db.get_last_trace("t")?.starts_with("Inserted: [3]"));
        Ok(())
    }
}
