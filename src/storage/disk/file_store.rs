use crate::access::Record;
use crate::catalog::TableMeta;
use crate::index::BitmapIndex;
use crate::storage::disk::frame;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::page::{PageNumber, RecordPage};
use crate::storage::store::Store;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const META_FILE: &str = "meta.bin";
const RECORDS_FILE: &str = "records.bin";
const PAGE_FILE_PREFIX: &str = "page_";
const INDEX_FILE_PREFIX: &str = "index_";
const FILE_EXTENSION: &str = ".bin";
const TEMP_EXTENSION: &str = ".tmp";

/// `Store` that keeps one directory per table under `root`:
///
/// ```text
/// root/<table>/meta.bin
/// root/<table>/records.bin
/// root/<table>/page_<n>.bin
/// root/<table>/index_<column>.bin
/// ```
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `root`.
    pub fn open(root: &Path) -> StorageResult<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn meta_path(&self, table: &str) -> StorageResult<PathBuf> {
        Ok(self.table_dir(table)?.join(META_FILE))
    }

    pub fn records_path(&self, table: &str) -> StorageResult<PathBuf> {
        Ok(self.table_dir(table)?.join(RECORDS_FILE))
    }

    pub fn page_path(&self, table: &str, page: PageNumber) -> StorageResult<PathBuf> {
        Ok(self
            .table_dir(table)?
            .join(format!("{}{}{}", PAGE_FILE_PREFIX, page.0, FILE_EXTENSION)))
    }

    pub fn index_path(&self, table: &str, column: &str) -> StorageResult<PathBuf> {
        check_key(column)?;
        Ok(self
            .table_dir(table)?
            .join(format!("{}{}{}", INDEX_FILE_PREFIX, column, FILE_EXTENSION)))
    }

    fn table_dir(&self, table: &str) -> StorageResult<PathBuf> {
        check_key(table)?;
        Ok(self.root.join(table))
    }

    fn read<T: DeserializeOwned>(&self, path: &Path) -> StorageResult<Option<T>> {
        match fs::read(path) {
            Ok(data) => frame::decode(path, &data).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes through a temporary file and renames it into place so a reader
    /// never sees a half-written frame.
    fn write<T: Serialize>(&self, path: &Path, value: &T) -> StorageResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let data = frame::encode(value)?;
        let mut temp = path.as_os_str().to_owned();
        temp.push(TEMP_EXTENSION);
        let temp = PathBuf::from(temp);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp)?;
        file.write_all(&data)?;
        file.sync_all()?;
        fs::rename(&temp, path)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn reset_all(&self) -> StorageResult<()> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn load_table_meta(&self, table: &str) -> StorageResult<Option<TableMeta>> {
        self.read(&self.meta_path(table)?)
    }

    fn store_table_meta(&self, table: &str, meta: &TableMeta) -> StorageResult<()> {
        self.write(&self.meta_path(table)?, meta)
    }

    fn load_records(&self, table: &str) -> StorageResult<Option<Vec<Record>>> {
        self.read(&self.records_path(table)?)
    }

    fn store_records(&self, table: &str, records: &[Record]) -> StorageResult<()> {
        self.write(&self.records_path(table)?, &records)
    }

    fn load_page(&self, table: &str, page: PageNumber) -> StorageResult<Option<RecordPage>> {
        self.read(&self.page_path(table, page)?)
    }

    fn store_page(&self, table: &str, page: PageNumber, data: &RecordPage) -> StorageResult<()> {
        self.write(&self.page_path(table, page)?, data)
    }

    fn load_index(&self, table: &str, column: &str) -> StorageResult<Option<BitmapIndex>> {
        self.read(&self.index_path(table, column)?)
    }

    fn store_index(&self, table: &str, column: &str, index: &BitmapIndex) -> StorageResult<()> {
        self.write(&self.index_path(table, column)?, index)
    }

    fn trace_all(&self) -> StorageResult<String> {
        let mut lines = Vec::new();
        let mut tables: Vec<_> = fs::read_dir(&self.root)?.collect::<Result<_, _>>()?;
        tables.sort_by_key(|e| e.file_name());

        for table in tables {
            if !table.file_type()?.is_dir() {
                continue;
            }
            let mut files: Vec<_> = fs::read_dir(table.path())?.collect::<Result<_, _>>()?;
            files.sort_by_key(|e| e.file_name());

            for file in files {
                lines.push(format!(
                    "{}/{} ({} bytes)",
                    table.file_name().to_string_lossy(),
                    file.file_name().to_string_lossy(),
                    file.metadata()?.len()
                ));
            }
        }
        Ok(lines.join("\n"))
    }
}

/// Table and column names become path components, so they must be plain names.
fn check_key(key: &str) -> StorageResult<()> {
    let invalid = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
