//! Table catalog.
//!
//! Tables are described by a [`TableMeta`] record that the persistence layer
//! stores under the table name. There is no catalog-wide table list; a table
//! exists exactly when its metadata can be loaded.

pub mod table_meta;

pub use table_meta::TableMeta;
