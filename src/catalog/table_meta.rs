//! Table metadata.

use crate::access::format_list;
use crate::config::EngineConfig;
use crate::storage::page::PageNumber;
use crate::trace::TraceLog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Persisted description of a table.
///
/// The table's reference record set is stored under its own key (see
/// [`Store::load_records`](crate::storage::Store::load_records)) so that
/// metadata writes do not grow with the table.
///
/// Counts obey `record_count <= page_count * page_capacity` and, for a
/// non-empty table, `record_count > (page_count - 1) * page_capacity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    pub name: String,
    pub columns: Vec<String>,
    pub page_capacity: usize,
    pub page_count: usize,
    pub record_count: usize,
    pub indexed_columns: BTreeSet<String>,
    pub trace: TraceLog,
}

impl TableMeta {
    pub fn new(name: &str, columns: Vec<String>, config: &EngineConfig) -> Self {
        let mut trace = TraceLog::new(config.trace_retention);
        trace.push(format!(
            "Table created name:{}, columnsNames:{}",
            name,
            format_list(&columns)
        ));

        Self {
            name: name.to_string(),
            columns,
            page_capacity: config.page_capacity.max(1),
            page_count: 0,
            record_count: 0,
            indexed_columns: BTreeSet::new(),
            trace,
        }
    }

    pub fn column_position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn last_page(&self) -> Option<PageNumber> {
        self.page_count.checked_sub(1).map(PageNumber)
    }

    pub fn pages(&self) -> impl Iterator<Item = PageNumber> {
        (0..self.page_count).map(PageNumber)
    }

    pub fn is_indexed(&self, column: &str) -> bool {
        self.indexed_columns.contains(column)
    }

    /// Registers `column` as indexed. Returns `false` if it already was.
    pub fn add_indexed_column(&mut self, column: &str) -> bool {
        self.indexed_columns.insert(column.to_string())
    }

    pub fn indexed_columns(&self) -> Vec<&str> {
        self.indexed_columns.iter().map(String::as_str).collect()
    }

    /// All trace entries, one per line, followed by a summary line.
    pub fn full_trace(&self) -> String {
        let mut out = String::new();
        for entry in self.trace.entries() {
            out.push_str(entry);
            out.push('\n');
        }
        out.push_str(&format!(
            "Pages Count: {}, Records Count: {}, Indexed Columns: {}",
            self.page_count,
            self.record_count,
            format_list(&self.indexed_columns())
        ));
        out
    }

    pub fn last_trace(&self) -> String {
        self.trace.last().unwrap_or_default().to_string()
    }

    /// Whether the page/record counts are consistent with the page capacity.
    pub fn counts_consistent(&self) -> bool {
        let upper = self.page_count * self.page_capacity;
        let lower = self.page_count.saturating_sub(1) * self.page_capacity;
        if self.page_count == 0 {
            self.record_count == 0
        } else {
            self.record_count <= upper && self.record_count > lower
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> TableMeta {
        let columns = ["id", "name", "major", "semester", "gpa"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        TableMeta::new("student", columns, &EngineConfig::default())
    }

    #[test]
    fn test_new_table_trace() {
        let meta = student();
        assert_eq!(meta.trace.len(), 1);
        assert_eq!(
            meta.last_trace(),
            "Table created name:student, columnsNames:[id, name, major, semester, gpa]"
        );
        assert!(meta.counts_consistent());
        assert_eq!(meta.last_page(), None);
    }

    #[test]
    fn test_column_position() {
        let meta = student();
        assert_eq!(meta.column_position("id"), Some(0));
        assert_eq!(meta.column_position("gpa"), Some(4));
        assert_eq!(meta.column_position("missing"), None);
    }

    #[test]
    fn test_indexed_columns_sorted_and_deduplicated() {
        let mut meta = student();
        assert!(meta.add_indexed_column("major"));
        assert!(meta.add_indexed_column("gpa"));
        assert!(!meta.add_indexed_column("major"));

        assert_eq!(meta.indexed_columns(), vec!["gpa", "major"]);
        assert!(meta.is_indexed("gpa"));
        assert!(!meta.is_indexed("id"));
    }

    #[test]
    fn test_full_trace_summary() {
        let mut meta = student();
        meta.page_count = 2;
        meta.record_count = 3;
        meta.add_indexed_column("major");
        meta.add_indexed_column("gpa");

        let full = meta.full_trace();
        let lines: Vec<_> = full.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "Pages Count: 2, Records Count: 3, Indexed Columns: [gpa, major]"
        );
    }

    #[test]
    fn test_counts_consistent() {
        let mut meta = student();
        meta.page_count = 2;
        meta.record_count = 3;
        assert!(meta.counts_consistent());

        meta.record_count = 2;
        assert!(!meta.counts_consistent());

        meta.record_count = 5;
        assert!(!meta.counts_consistent());
    }

    #[test]
    fn test_last_trace_empty_log() {
        let mut meta = student();
        meta.trace = TraceLog::default();
        assert_eq!(meta.last_trace(), "");
    }
}
