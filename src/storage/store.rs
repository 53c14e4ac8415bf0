use crate::access::Record;
use crate::catalog::TableMeta;
use crate::index::BitmapIndex;
use crate::storage::error::StorageResult;
use crate::storage::page::{PageNumber, RecordPage};

/// Keyed persistence for table metadata, reference record sets, pages and
/// indexes.
///
/// Each key space is independent. A load returns the last stored value for the
/// key, or `None` if nothing was stored; stores overwrite without merging.
pub trait Store: Send + Sync {
    /// Remove everything.
    fn reset_all(&self) -> StorageResult<()>;

    fn load_table_meta(&self, table: &str) -> StorageResult<Option<TableMeta>>;

    fn store_table_meta(&self, table: &str, meta: &TableMeta) -> StorageResult<()>;

    /// Every record appended to the table, in global-position order.
    fn load_records(&self, table: &str) -> StorageResult<Option<Vec<Record>>>;

    fn store_records(&self, table: &str, records: &[Record]) -> StorageResult<()>;

    fn load_page(&self, table: &str, page: PageNumber) -> StorageResult<Option<RecordPage>>;

    fn store_page(&self, table: &str, page: PageNumber, data: &RecordPage) -> StorageResult<()>;

    fn load_index(&self, table: &str, column: &str) -> StorageResult<Option<BitmapIndex>>;

    fn store_index(&self, table: &str, column: &str, index: &BitmapIndex) -> StorageResult<()>;

    /// Human-readable listing of what is stored.
    fn trace_all(&self) -> StorageResult<String>;
}
