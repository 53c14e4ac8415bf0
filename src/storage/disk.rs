//! File-backed persistence.

pub mod file_store;
pub mod frame;

pub use file_store::FileStore;
