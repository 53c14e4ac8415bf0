//! Fixed-capacity record pages.
//!
//! A page is the unit the persistence layer loads and stores. Records are
//! appended in order and never moved, updated or removed, so the position of a
//! record inside its page is stable for the life of the table.

use crate::access::{Condition, Record};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based page number within a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageNumber(pub usize);

impl PageNumber {
    /// Page holding the record at `position` when every page has `capacity` slots.
    pub fn for_position(position: usize, capacity: usize) -> Self {
        PageNumber(position / capacity)
    }

    /// Global position of the first slot on this page.
    pub fn first_position(&self, capacity: usize) -> usize {
        self.0 * capacity
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPage {
    capacity: usize,
    records: Vec<Record>,
}

impl RecordPage {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: Vec::with_capacity(capacity),
        }
    }

    /// Appends `record` if there is room. Returns `false` and leaves the page
    /// untouched when it is already full.
    pub fn insert(&mut self, record: Record) -> bool {
        if self.is_full() {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn select_all(&self) -> Vec<Record> {
        self.records.clone()
    }

    pub fn select_by_condition(&self, cond: &Condition) -> Vec<Record> {
        self.records
            .iter()
            .filter(|record| cond.matches(record))
            .cloned()
            .collect()
    }

    /// The record at `offset` as a one-element vector, or an empty one.
    pub fn select_at(&self, offset: usize) -> Vec<Record> {
        self.records.get(offset).cloned().into_iter().collect()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }
}
