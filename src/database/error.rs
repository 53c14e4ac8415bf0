//! Engine-level error types.

use thiserror::Error;

/// Errors reported by [`Database`](crate::Database) operations. They are
/// returned inside `anyhow::Error`; use `downcast_ref` to match on them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    #[error("Table '{0}' already exists")]
    TableAlreadyExists(String),

    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("Column '{column}' does not exist in table '{table}'")]
    InvalidColumn { table: String, column: String },

    #[error("Record has {actual} fields but the table has {expected} columns")]
    RecordArity { expected: usize, actual: usize },

    #[error("Condition has {columns} columns but {values} values")]
    ConditionArity { columns: usize, values: usize },
}
