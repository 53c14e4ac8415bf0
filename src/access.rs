//! Access layer for record-oriented operations.
//!
//! This module provides the logical view that pages and selections work with:
//!
//! - **Record**: An ordered sequence of string fields aligned to a table's columns
//! - **Condition**: A per-column equality filter with wildcard slots
//!
//! Everything above the storage layer passes records and conditions around
//! rather than raw page contents.

pub mod condition;
pub mod record;

pub use condition::Condition;
pub use record::{Record, format_list};
